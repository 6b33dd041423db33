//! Classify a day's planned files against live repository status.
//!
//! Read-only: staging happens in [`crate::publish`].

use std::path::Path;

use cadence_core::FileChange;

use crate::error::VcsError;
use crate::vcs::{PathStatus, VersionControl};

/// Planned files, split by what today's run should do with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Untracked or modified; staged this run.
    pub candidates: Vec<String>,
    /// Already committed and unchanged.
    pub skipped: Vec<String>,
    /// Listed in the plan but absent on disk.
    pub missing: Vec<String>,
    /// Status query failed (e.g. the path lies outside the repository).
    pub unreadable: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
            && self.skipped.is_empty()
            && self.missing.is_empty()
            && self.unreadable.is_empty()
    }
}

/// Classify one path.
pub fn classify(
    vcs: &dyn VersionControl,
    root: &Path,
    path: &str,
) -> Result<FileChange, VcsError> {
    if !root.join(path).exists() {
        return Ok(FileChange::Missing);
    }
    Ok(match vcs.path_status(path)? {
        PathStatus::Untracked => FileChange::Untracked,
        PathStatus::Modified => FileChange::ModifiedTracked,
        PathStatus::Clean => FileChange::UnchangedTracked,
    })
}

/// Classify every planned file for the day, preserving plan order.
///
/// A path whose status cannot be read goes to `unreadable` with a warning.
pub fn resolve_day(vcs: &dyn VersionControl, root: &Path, files: &[String]) -> Resolution {
    let mut resolution = Resolution::default();

    for path in files {
        let change = match classify(vcs, root, path) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!("cannot read status of planned file, skipping: {path}: {e}");
                resolution.unreadable.push(path.clone());
                continue;
            }
        };
        tracing::debug!("{path}: {change}");
        match change {
            FileChange::Missing => {
                tracing::warn!("planned file missing on disk, skipping: {path}");
                resolution.missing.push(path.clone());
            }
            FileChange::UnchangedTracked => {
                tracing::info!("already committed: {path}");
                resolution.skipped.push(path.clone());
            }
            FileChange::Untracked | FileChange::ModifiedTracked => {
                resolution.candidates.push(path.clone());
            }
        }
    }

    resolution
}

/// Untracked files elsewhere in the tree to publish when the plan's list
/// produced nothing. Cadence's own files and anything under `.git/` are
/// excluded; at most `limit` paths, in listing order.
pub fn fallback_candidates(
    vcs: &dyn VersionControl,
    exclude: &[String],
    limit: usize,
) -> Result<Vec<String>, VcsError> {
    let picked: Vec<String> = vcs
        .untracked_files()?
        .into_iter()
        .filter(|path| !exclude.iter().any(|e| e == path))
        .filter(|path| path != ".git" && !path.starts_with(".git/"))
        .take(limit)
        .collect();
    Ok(picked)
}
