//! Compare the top-level files of two directories.
//!
//! Used to check a published mirror directory against a locally built one:
//! every name present on both sides is run through `diff`, and files are
//! grouped by whether their contents match. Non-empty diffs are written next
//! to the report as `<name>.diff.txt`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::error::{Error, Result};

pub const IDENTICAL: &str = "Identical";
pub const HAS_DIFFERENCES: &str = "Has differences";

#[derive(Debug, Clone, Serialize)]
pub struct DiffGroup {
    pub label: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub left: String,
    pub right: String,
    pub groups: Vec<DiffGroup>,
    /// Diff files written to the output directory
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub written: Vec<String>,
    /// Names found in only one of the two directories
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

impl DiffReport {
    pub fn group(&self, label: &str) -> Option<&DiffGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// Compare `left` and `right`, writing diff output into `output_dir`.
pub fn compare(left: &Path, right: &Path, output_dir: &Path) -> Result<DiffReport> {
    for dir in [left, right] {
        if !dir.is_dir() {
            return Err(Error::validation_invalid_argument(
                "dir",
                format!("Not a directory: {}", dir.display()),
                None,
            ));
        }
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("create {}", output_dir.display())))
    })?;

    let left_names = list_names(left)?;
    let right_names = list_names(right)?;

    log_status!(
        "diff",
        "Comparing {} ({} entries) with {} ({} entries)",
        left.display(),
        left_names.len(),
        right.display(),
        right_names.len()
    );

    let mut grouped: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut written = Vec::new();
    let mut unmatched = Vec::new();

    for name in left_names.union(&right_names) {
        if !(left_names.contains(name) && right_names.contains(name)) {
            unmatched.push(name.clone());
            continue;
        }

        let diff = run_diff(&left.join(name), &right.join(name))?;
        if diff.trim().is_empty() {
            grouped.entry(IDENTICAL).or_default().push(name.clone());
        } else {
            let out = output_dir.join(format!("{}.diff.txt", name));
            fs::write(&out, &diff).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("write {}", out.display())))
            })?;
            written.push(out.display().to_string());
            grouped.entry(HAS_DIFFERENCES).or_default().push(name.clone());
        }
    }

    Ok(DiffReport {
        left: left.display().to_string(),
        right: right.display().to_string(),
        groups: grouped
            .into_iter()
            .map(|(label, files)| DiffGroup {
                label: label.to_string(),
                files,
            })
            .collect(),
        written,
        unmatched,
    })
}

fn list_names(dir: &Path) -> Result<BTreeSet<String>> {
    let pattern = format!("{}/*", glob::Pattern::escape(&dir.display().to_string()));
    // Hidden entries (`.git`, editor files) are not part of the comparison.
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let entries = glob::glob_with(&pattern, options).map_err(|e| {
        Error::validation_invalid_argument("dir", e.to_string(), Some(vec![pattern.clone()]))
    })?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let path: PathBuf = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
        })?;
        if let Some(name) = path.file_name() {
            names.insert(name.to_string_lossy().to_string());
        }
    }
    Ok(names)
}

// `diff` exits 0 when equal, 1 when different, 2 on trouble.
fn run_diff(a: &Path, b: &Path) -> Result<String> {
    let output = Command::new("diff")
        .arg(a)
        .arg(b)
        .output()
        .map_err(|e| Error::internal_io(e.to_string(), Some("run diff".to_string())))?;

    match output.status.code() {
        Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
        _ => Err(Error::internal_io(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
            Some(format!("diff {} {}", a.display(), b.display())),
        )),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn groups_shared_files_by_content() {
        let root = tempfile::tempdir().unwrap();
        let main = root.path().join("main");
        let explore = root.path().join("explore");
        let out = root.path().join("out");
        fs::create_dir_all(&main).unwrap();
        fs::create_dir_all(&explore).unwrap();

        write(&main, "same.json", "{}\n");
        write(&explore, "same.json", "{}\n");
        write(&main, "changed.json", "{\"a\": 1}\n");
        write(&explore, "changed.json", "{\"a\": 2}\n");
        write(&main, "only-main.json", "x\n");

        let report = compare(&main, &explore, &out).unwrap();

        assert_eq!(report.group(IDENTICAL).unwrap().files, ["same.json"]);
        assert_eq!(
            report.group(HAS_DIFFERENCES).unwrap().files,
            ["changed.json"]
        );
        assert_eq!(report.unmatched, ["only-main.json"]);
        assert!(out.join("changed.json.diff.txt").exists());
        assert!(!out.join("same.json.diff.txt").exists());
    }

    #[test]
    fn groups_are_sorted_by_label() {
        let root = tempfile::tempdir().unwrap();
        let (a, b) = (root.path().join("a"), root.path().join("b"));
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        write(&a, "x", "1\n");
        write(&b, "x", "2\n");
        write(&a, "y", "1\n");
        write(&b, "y", "1\n");

        let report = compare(&a, &b, root.path()).unwrap();
        let labels: Vec<&str> = report.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, [HAS_DIFFERENCES, IDENTICAL]);
    }

    #[test]
    fn hidden_files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        let (a, b) = (root.path().join("a"), root.path().join("b"));
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        write(&a, ".hidden", "1\n");
        write(&b, ".hidden", "2\n");
        write(&a, ".only-a", "1\n");

        let report = compare(&a, &b, &root.path().join("out")).unwrap();
        assert!(report.groups.is_empty());
        assert!(report.unmatched.is_empty());
        assert!(!root.path().join("out/.hidden.diff.txt").exists());
    }

    #[test]
    fn missing_directory_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err = compare(&root.path().join("nope"), root.path(), root.path()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationInvalidArgument);
    }
}
