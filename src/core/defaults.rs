use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths;

/// Root configuration structure for releaser.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaserConfig {
    #[serde(default)]
    pub defaults: Defaults,

    /// Release targets. When present in the file this replaces the built-in list.
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,
}

impl Default for ReleaserConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            targets: default_targets(),
        }
    }
}

/// All configurable defaults that can be overridden via releaser.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_mirror")]
    pub mirror: MirrorConfig,

    #[serde(default = "default_build")]
    pub build: BuildConfig,

    #[serde(default = "default_publish")]
    pub publish: PublishConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mirror: default_mirror(),
            build: default_build(),
            publish: default_publish(),
        }
    }
}

/// The git checkout that mirrors the object store contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default = "default_mirror_path")]
    pub path: String,

    #[serde(default = "default_mirror_branch")]
    pub branch: String,

    #[serde(default = "default_mirror_remote")]
    pub remote: String,

    /// Directory inside the mirror that is synced to the bucket
    #[serde(default = "default_mirror_artifact_dir")]
    pub artifact_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_tag_command")]
    pub tag_command: String,

    #[serde(default = "default_build_command")]
    pub build_command: String,

    /// Where the build tool leaves `<artifact>-assembly-*.jar`
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_bucket_url")]
    pub bucket_url: String,

    #[serde(default = "default_grants")]
    pub grants: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    pub name: String,

    /// Artifact base name; defaults to the target name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

impl TargetConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            artifact: None,
        }
    }

    pub fn artifact(&self) -> &str {
        self.artifact.as_deref().unwrap_or(&self.name)
    }
}

// =============================================================================
// Default value functions (the api-build / api-lint release sequence)
// =============================================================================

fn default_targets() -> Vec<TargetConfig> {
    vec![TargetConfig::new("api-build"), TargetConfig::new("api-lint")]
}

fn default_mirror() -> MirrorConfig {
    MirrorConfig {
        path: default_mirror_path(),
        branch: default_mirror_branch(),
        remote: default_mirror_remote(),
        artifact_dir: default_mirror_artifact_dir(),
    }
}

fn default_mirror_path() -> String {
    "../aws-s3-public".to_string()
}

fn default_mirror_branch() -> String {
    "master".to_string()
}

fn default_mirror_remote() -> String {
    "origin".to_string()
}

fn default_mirror_artifact_dir() -> String {
    "util".to_string()
}

fn default_build() -> BuildConfig {
    BuildConfig {
        tag_command: default_tag_command(),
        build_command: default_build_command(),
        output_dir: default_output_dir(),
    }
}

fn default_tag_command() -> String {
    "dev tag".to_string()
}

fn default_build_command() -> String {
    "sbt clean assembly".to_string()
}

fn default_output_dir() -> String {
    "./target/scala-2.13".to_string()
}

fn default_publish() -> PublishConfig {
    PublishConfig {
        bucket_url: default_bucket_url(),
        grants: default_grants(),
    }
}

fn default_bucket_url() -> String {
    "s3://io.flow.aws-s3-public/util".to_string()
}

fn default_grants() -> String {
    "read=uri=http://acs.amazonaws.com/groups/global/AllUsers".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the effective config. A missing file yields built-in defaults;
/// an unreadable or invalid file is an error.
pub fn load_config() -> Result<ReleaserConfig> {
    let path = paths::releaser_json()?;
    if !path.exists() {
        return Ok(ReleaserConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ReleaserConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: ReleaserConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    validate(&config)?;
    Ok(config)
}

/// Get the path to releaser.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::releaser_json()?.display().to_string())
}

/// Check if the config file exists
pub fn config_exists() -> bool {
    paths::releaser_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

fn validate(config: &ReleaserConfig) -> Result<()> {
    let required = [
        ("defaults.mirror.path", &config.defaults.mirror.path),
        ("defaults.mirror.branch", &config.defaults.mirror.branch),
        ("defaults.mirror.remote", &config.defaults.mirror.remote),
        ("defaults.mirror.artifact_dir", &config.defaults.mirror.artifact_dir),
        ("defaults.build.build_command", &config.defaults.build.build_command),
        ("defaults.build.output_dir", &config.defaults.build.output_dir),
        ("defaults.publish.bucket_url", &config.defaults.publish.bucket_url),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(Error::config_invalid_value(key, None, "must not be empty"));
        }
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        let name = target.name.trim();
        if name.is_empty() || target.artifact().trim().is_empty() {
            return Err(Error::config_invalid_value(
                "targets",
                Some(target.name.clone()),
                "target name and artifact must not be empty",
            ));
        }
        if target.artifact().contains('/') {
            return Err(Error::config_invalid_value(
                "targets",
                Some(target.artifact().to_string()),
                "artifact name must not contain '/'",
            ));
        }
        if !seen.insert(name) {
            return Err(Error::config_invalid_value(
                "targets",
                Some(target.name.clone()),
                "duplicate target name",
            ));
        }
    }

    Ok(())
}
