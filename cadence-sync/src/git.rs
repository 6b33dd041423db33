//! [`VersionControl`] backed by the `git` command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::VcsError;
use crate::vcs::{PathStatus, PendingOperation, VersionControl};

/// Runs `git` with the repository root as working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git <args>` and return stdout on success.
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!("{command}");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::Failed {
                command,
                code: output.status.code(),
                output: format!("{stderr}{stdout}"),
            });
        }
        Ok(stdout)
    }

    fn git_dir(&self) -> Result<PathBuf, VcsError> {
        let out = self.run(&["rev-parse", "--git-dir"])?;
        Ok(self.root.join(out.trim()))
    }
}

fn split_nul(out: &str) -> Vec<String> {
    out.split('\0')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl VersionControl for GitCli {
    fn is_repository(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    fn path_status(&self, path: &str) -> Result<PathStatus, VcsError> {
        let out = self.run(&[
            "status",
            "--porcelain=v1",
            "--untracked-files=all",
            "--",
            path,
        ])?;
        let mut lines = out.lines().filter(|l| !l.trim().is_empty()).peekable();
        if lines.peek().is_none() {
            return Ok(PathStatus::Clean);
        }
        if lines.any(|l| !l.starts_with("??")) {
            return Ok(PathStatus::Modified);
        }
        Ok(PathStatus::Untracked)
    }

    fn untracked_files(&self) -> Result<Vec<String>, VcsError> {
        let out = self.run(&["ls-files", "--others", "--exclude-standard", "-z"])?;
        Ok(split_nul(&out))
    }

    fn add(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["add", "--", path]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    fn pending_operation(&self) -> Result<Option<PendingOperation>, VcsError> {
        let git_dir = self.git_dir()?;
        if git_dir.join("rebase-merge").exists() || git_dir.join("rebase-apply").exists() {
            return Ok(Some(PendingOperation::Rebase));
        }
        if git_dir.join("MERGE_HEAD").exists() {
            return Ok(Some(PendingOperation::Merge));
        }
        Ok(None)
    }

    fn abort(&self, op: PendingOperation) -> Result<(), VcsError> {
        match op {
            PendingOperation::Rebase => self.run(&["rebase", "--abort"]),
            PendingOperation::Merge => self.run(&["merge", "--abort"]),
        }
        .map(drop)
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.run(&["pull", "--no-rebase", "--no-edit", remote, branch])
            .map(drop)
    }

    fn conflicted_paths(&self) -> Result<Vec<String>, VcsError> {
        let out = self.run(&["diff", "--name-only", "--diff-filter=U", "-z"])?;
        Ok(split_nul(&out))
    }

    fn checkout_ours(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["checkout", "--ours", "--", path]).map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.run(&["push", "-u", remote, branch]).map(drop)
    }

    fn current_branch(&self) -> Result<String, VcsError> {
        let out = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>, VcsError> {
        match self.run(&["remote", "get-url", remote]) {
            Ok(out) => {
                let url = out.trim();
                Ok((!url.is_empty()).then(|| url.to_string()))
            }
            Err(VcsError::Failed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<(), VcsError> {
        self.run(&["remote", "add", remote, url]).map(drop)
    }
}
