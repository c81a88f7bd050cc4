//! Release jobs: turn a target plus config into the fixed command sequence.
//!
//! The sequence syncs the mirror checkout, tags and builds the artifact,
//! copies the jar into the mirror (versioned and as `<artifact>.jar`),
//! commits and pushes, then syncs the mirror's artifact dir to the bucket.

use serde::Serialize;

use crate::defaults::{self, Defaults, ReleaserConfig, TargetConfig};
use crate::error::{Error, Result};
use crate::executor::{Job, JobRun};
use crate::utils::shell::quote_arg;

#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub artifact: String,
    pub steps: usize,
}

/// Find a target by name in the loaded config.
pub fn resolve_target<'a>(config: &'a ReleaserConfig, name: &str) -> Result<&'a TargetConfig> {
    config
        .targets
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| {
            Error::target_not_found(
                name,
                config.targets.iter().map(|t| t.name.clone()).collect(),
            )
        })
}

pub fn list_targets(config: &ReleaserConfig) -> Vec<TargetSummary> {
    config
        .targets
        .iter()
        .map(|t| TargetSummary {
            name: t.name.clone(),
            artifact: t.artifact().to_string(),
            steps: build_job(&config.defaults, t).len(),
        })
        .collect()
}

/// Build the release job for `name` from the given config.
pub fn job_for(config: &ReleaserConfig, name: &str) -> Result<Job> {
    let target = resolve_target(config, name)?;
    Ok(build_job(&config.defaults, target))
}

/// Load config and run the release for `name` with output streamed.
pub fn release(name: &str) -> Result<JobRun> {
    let config = defaults::load_config()?;
    job_for(&config, name)?.run()
}

/// Entry point for the per-target binaries: plain-text output, no JSON envelope.
pub fn release_main(name: &str) -> std::process::ExitCode {
    match release(name) {
        Ok(run) => {
            println!(
                "[{}] released in {} step(s), {}ms",
                run.job,
                run.steps.len(),
                run.duration_ms
            );
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[{}] {}", name, err);
            for hint in &err.hints {
                eprintln!("[{}] hint: {}", name, hint.message);
            }
            let code = u8::try_from(err.code.exit_code()).unwrap_or(1);
            std::process::ExitCode::from(code)
        }
    }
}

pub fn build_job(defaults: &Defaults, target: &TargetConfig) -> Job {
    let mirror = &defaults.mirror;
    let build = &defaults.build;
    let publish = &defaults.publish;

    let artifact = target.artifact();
    let mirror_path = shellexpand::tilde(&mirror.path).to_string();
    // Every mirror step re-enters the checkout in a fresh shell. A failed `cd`
    // must not let the git/aws command run in the caller's directory.
    let in_mirror = |command: String| format!("cd {} && {}", quote_arg(&mirror_path), command);

    let jar_glob = format!(
        "{}/{}-assembly-*.jar",
        quote_arg(&build.output_dir),
        quote_arg(artifact)
    );
    let artifact_path = format!("{}/{}", mirror.artifact_dir, artifact);
    let dest_dir = format!("{}/{}", mirror_path, artifact_path);

    let mut job = Job::create(target.name.clone())
        .add(in_mirror(format!("git checkout {}", quote_arg(&mirror.branch))))
        .add(in_mirror("git pull --rebase".to_string()))
        .add(in_mirror(format!(
            "git fetch --tags {}",
            quote_arg(&mirror.remote)
        )));

    if !build.tag_command.trim().is_empty() {
        job = job.add(build.tag_command.clone());
    }

    job.add(build.build_command.clone())
        .add(format!("cp {} {}/", jar_glob, quote_arg(&dest_dir)))
        .add(format!(
            "cp {} {}",
            jar_glob,
            quote_arg(&format!("{}/{}.jar", dest_dir, artifact))
        ))
        .add(in_mirror(format!("git add {}/*", quote_arg(&artifact_path))))
        .add(in_mirror(format!(
            "git commit -m {} {}",
            quote_arg(&format!("Add new version of {}", artifact)),
            quote_arg(&artifact_path)
        )))
        .add(in_mirror(format!(
            "git push {} {}",
            quote_arg(&mirror.remote),
            quote_arg(&mirror.branch)
        )))
        .add(in_mirror(format!(
            "aws s3 sync {} {} --grants {}",
            quote_arg(&mirror.artifact_dir),
            quote_arg(&publish.bucket_url),
            quote_arg(&publish.grants)
        )))
}
