//! Repository-local settings (`cadence.yaml`).
//!
//! Every field is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const SETTINGS_FILE: &str = "cadence.yaml";
pub const DEFAULT_PLAN_FILE: &str = "distribution_plan.txt";
pub const DEFAULT_PROGRESS_FILE: &str = "push_progress.txt";

/// Settings resolved against a repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Plan document, relative to the repository root.
    pub plan_file: PathBuf,
    /// Progress record, relative to the repository root.
    pub progress_file: PathBuf,
    pub remote: String,
    pub main_branch: String,
    /// Window length; when unset the progress record's `TotalDays` applies.
    pub total_days: Option<u32>,
    /// Untracked files staged when the day's list yields nothing.
    pub fallback_batch: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            progress_file: PathBuf::from(DEFAULT_PROGRESS_FILE),
            remote: "origin".to_string(),
            main_branch: "main".to_string(),
            total_days: None,
            fallback_batch: 5,
        }
    }
}

impl Settings {
    pub fn plan_path(&self, root: &Path) -> PathBuf {
        root.join(&self.plan_file)
    }

    pub fn progress_path(&self, root: &Path) -> PathBuf {
        root.join(&self.progress_file)
    }

    /// Repository-relative paths owned by Cadence itself, `/`-separated,
    /// including the progress record's `.tmp` sibling. Never staged by the
    /// untracked-file fallback.
    pub fn bookkeeping_files(&self) -> Vec<String> {
        let normalize = |p: &Path| {
            p.to_string_lossy()
                .replace('\\', "/")
                .trim_start_matches("./")
                .to_string()
        };
        let progress = normalize(self.progress_file.as_path());
        vec![
            normalize(self.plan_file.as_path()),
            format!("{progress}.tmp"),
            progress,
            normalize(Path::new(SETTINGS_FILE)),
        ]
    }
}

/// Path of `cadence.yaml` under `root`. Pure, no I/O.
pub fn settings_path_at(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

/// Load settings for the repository at `root`.
///
/// Returns defaults when `cadence.yaml` is absent, and
/// [`ConfigError::Parse`] (with path and line context) when it is malformed.
pub fn load_at(root: &Path) -> Result<Settings, ConfigError> {
    let path = settings_path_at(root);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_absent() {
        let root = TempDir::new().unwrap();
        let settings = load_at(root.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.total_days, None);
        assert_eq!(settings.fallback_batch, 5);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            settings_path_at(root.path()),
            "main_branch: trunk\nplan_file: plans/days.txt\n",
        )
        .unwrap();
        let settings = load_at(root.path()).unwrap();
        assert_eq!(settings.main_branch, "trunk");
        assert_eq!(settings.plan_path(root.path()), root.path().join("plans/days.txt"));
        assert_eq!(settings.remote, "origin");
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let root = TempDir::new().unwrap();
        std::fs::write(settings_path_at(root.path()), "force_push: true\n").unwrap();
        let err = load_at(root.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("cadence.yaml"));
    }

    #[test]
    fn bookkeeping_files_are_repo_relative() {
        let settings = Settings {
            plan_file: PathBuf::from("./plans/days.txt"),
            ..Default::default()
        };
        assert_eq!(
            settings.bookkeeping_files(),
            vec![
                "plans/days.txt",
                "push_progress.txt.tmp",
                "push_progress.txt",
                "cadence.yaml"
            ]
        );
    }

    #[test]
    fn total_days_is_read_when_set() {
        let root = TempDir::new().unwrap();
        std::fs::write(settings_path_at(root.path()), "total_days: 45\n").unwrap();
        let settings = load_at(root.path()).unwrap();
        assert_eq!(settings.total_days, Some(45));
    }
}
