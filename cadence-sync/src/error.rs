//! Error types for cadence-sync.

use std::path::PathBuf;

use thiserror::Error;

use cadence_core::{ConfigError, PlanError, ProgressError};

/// A failed version-control call.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The command could not be started at all (binary missing, bad cwd).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero. `output` is stderr then stdout.
    #[error("`{command}` exited with {}: {}", exit_label(.code), .output.trim())]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl VcsError {
    fn output(&self) -> &str {
        match self {
            VcsError::Spawn { .. } => "",
            VcsError::Failed { output, .. } => output,
        }
    }

    /// A pull stopped on conflicting content.
    pub fn is_conflict(&self) -> bool {
        let out = self.output();
        out.contains("CONFLICT")
            || out.contains("Automatic merge failed")
            || out.contains("fix conflicts")
    }

    /// The remote refused the push because it has commits we lack.
    pub fn is_rejected(&self) -> bool {
        let out = self.output();
        out.contains("[rejected]")
            || out.contains("non-fast-forward")
            || out.contains("fetch first")
            || out.contains("failed to push some refs")
    }

    /// The pushed branch does not exist locally.
    pub fn is_unknown_refspec(&self) -> bool {
        self.output().contains("src refspec")
    }

    /// The branch does not exist on the remote yet (first publish).
    pub fn is_missing_remote_ref(&self) -> bool {
        self.output().contains("couldn't find remote ref")
    }
}

/// Fatal problems with the environment the run starts in.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{path} is not inside a git repository")]
    NotARepository { path: PathBuf },

    #[error("distribution plan missing at {path}; run the plan generator first")]
    PlanMissing { path: PathBuf },
}

/// All errors that end a run with a non-zero exit.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("progress record error: {0}")]
    Progress(#[from] ProgressError),

    #[error("settings error: {0}")]
    Config(#[from] ConfigError),

    #[error("version control error: {0}")]
    Vcs(#[from] VcsError),

    /// The commit itself failed; nothing was recorded.
    #[error("commit failed: {0}")]
    CommitFailed(#[source] VcsError),
}
