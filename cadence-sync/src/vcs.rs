//! Version-control collaborator.
//!
//! The pipeline only talks to [`VersionControl`]; [`crate::git::GitCli`] is
//! the production implementation and tests inject a scripted double.

use std::fmt;

use crate::error::VcsError;

/// Working-tree status of a single path, as git reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Untracked,
    Modified,
    Clean,
}

/// An operation git left half-finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperation {
    Rebase,
    Merge,
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOperation::Rebase => write!(f, "rebase"),
            PendingOperation::Merge => write!(f, "merge"),
        }
    }
}

/// The repository primitives Cadence needs. All calls block.
pub trait VersionControl {
    /// Whether the working directory is inside a repository.
    fn is_repository(&self) -> bool;

    /// Status of one repository-relative path.
    fn path_status(&self, path: &str) -> Result<PathStatus, VcsError>;

    /// Untracked, non-ignored files across the working tree, in listing order.
    fn untracked_files(&self) -> Result<Vec<String>, VcsError>;

    fn add(&self, path: &str) -> Result<(), VcsError>;

    fn commit(&self, message: &str) -> Result<(), VcsError>;

    fn pending_operation(&self) -> Result<Option<PendingOperation>, VcsError>;

    fn abort(&self, op: PendingOperation) -> Result<(), VcsError>;

    /// Merge-based pull (never rebase).
    fn pull(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    /// Paths with unresolved merge conflicts.
    fn conflicted_paths(&self) -> Result<Vec<String>, VcsError>;

    /// Replace a conflicted path with the local side.
    fn checkout_ours(&self, path: &str) -> Result<(), VcsError>;

    fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    fn current_branch(&self) -> Result<String, VcsError>;

    /// URL of `remote`, or `None` when it is not configured.
    fn remote_url(&self, remote: &str) -> Result<Option<String>, VcsError>;

    fn add_remote(&self, remote: &str, url: &str) -> Result<(), VcsError>;
}
