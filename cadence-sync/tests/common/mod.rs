//! Scripted [`VersionControl`] double and repository fixtures shared by the
//! cadence-sync integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use cadence_sync::{PathStatus, PendingOperation, VcsError, VersionControl};
use chrono::{NaiveDate, NaiveDateTime};

/// Git output for a rejected push.
pub const REJECTED: &str = " ! [rejected]        main -> main (non-fast-forward)\n\
error: failed to push some refs to 'origin'\n";

/// Git output for a pull that stopped on conflicts.
pub const CONFLICT: &str = "CONFLICT (content): Merge conflict in index.html\n\
Automatic merge failed; fix conflicts and then commit the result.\n";

pub const AUTH_FAILURE: &str = "fatal: Authentication failed for 'https://example.com/r.git/'\n";

/// In-memory repository that records every call and fails on request.
pub struct MockVcs {
    pub repository: bool,
    pub statuses: RefCell<HashMap<String, PathStatus>>,
    pub untracked: RefCell<Vec<String>>,
    pub conflicted: RefCell<Vec<String>>,
    pub pending: RefCell<Option<PendingOperation>>,
    pub branch: RefCell<String>,
    pub remote: RefCell<Option<String>>,
    /// Queued failure outputs per operation name; popped one per call.
    failures: RefCell<HashMap<&'static str, VecDeque<String>>>,
    pub calls: RefCell<Vec<String>>,
    pub commits: RefCell<Vec<String>>,
}

impl Default for MockVcs {
    fn default() -> Self {
        Self {
            repository: true,
            statuses: RefCell::default(),
            untracked: RefCell::default(),
            conflicted: RefCell::default(),
            pending: RefCell::default(),
            branch: RefCell::new("main".to_string()),
            remote: RefCell::new(Some("https://example.com/r.git".to_string())),
            failures: RefCell::default(),
            calls: RefCell::default(),
            commits: RefCell::default(),
        }
    }
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, path: &str, status: PathStatus) -> Self {
        self.statuses.borrow_mut().insert(path.to_string(), status);
        if status == PathStatus::Untracked {
            self.untracked.borrow_mut().push(path.to_string());
        }
        self
    }

    pub fn with_branch(self, branch: &str) -> Self {
        *self.branch.borrow_mut() = branch.to_string();
        self
    }

    pub fn outside_repository(mut self) -> Self {
        self.repository = false;
        self
    }

    pub fn without_remote(self) -> Self {
        *self.remote.borrow_mut() = None;
        self
    }

    /// Fail the next call to `op` with `output`.
    pub fn fail(self, op: &'static str, output: &str) -> Self {
        self.failures
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, op: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split_whitespace().next() == Some(op))
            .cloned()
            .collect()
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    fn call(&self, op: &'static str, args: &[&str]) -> Result<(), VcsError> {
        let line = std::iter::once(op)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        let queued = self
            .failures
            .borrow_mut()
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        match queued {
            Some(output) => Err(VcsError::Failed {
                command: format!("git {line}"),
                code: Some(1),
                output,
            }),
            None => Ok(()),
        }
    }
}

impl VersionControl for MockVcs {
    fn is_repository(&self) -> bool {
        self.repository
    }

    fn path_status(&self, path: &str) -> Result<PathStatus, VcsError> {
        self.call("status", &[path])?;
        Ok(self
            .statuses
            .borrow()
            .get(path)
            .copied()
            .unwrap_or(PathStatus::Clean))
    }

    fn untracked_files(&self) -> Result<Vec<String>, VcsError> {
        self.call("ls-files", &[])?;
        Ok(self.untracked.borrow().clone())
    }

    fn add(&self, path: &str) -> Result<(), VcsError> {
        self.call("add", &[path])
    }

    fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.call("commit", &[message])?;
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn pending_operation(&self) -> Result<Option<PendingOperation>, VcsError> {
        Ok(*self.pending.borrow())
    }

    fn abort(&self, op: PendingOperation) -> Result<(), VcsError> {
        let name = op.to_string();
        self.call("abort", &[&name])?;
        *self.pending.borrow_mut() = None;
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.call("pull", &[remote, branch])
    }

    fn conflicted_paths(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.conflicted.borrow().clone())
    }

    fn checkout_ours(&self, path: &str) -> Result<(), VcsError> {
        self.call("checkout-ours", &[path])
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.call("push", &[remote, branch])
    }

    fn current_branch(&self) -> Result<String, VcsError> {
        Ok(self.branch.borrow().clone())
    }

    fn remote_url(&self, _remote: &str) -> Result<Option<String>, VcsError> {
        Ok(self.remote.borrow().clone())
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<(), VcsError> {
        self.call("remote-add", &[remote, url])?;
        *self.remote.borrow_mut() = Some(url.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create files (with placeholder content) under `root`.
pub fn touch(root: &Path, paths: &[&str]) {
    for path in paths {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&full, format!("// {path}\n")).expect("write file");
    }
}

pub fn write_plan(root: &Path, text: &str) {
    fs::write(root.join("distribution_plan.txt"), text).expect("write plan");
}

pub fn write_progress(root: &Path, text: &str) {
    fs::write(root.join("push_progress.txt"), text).expect("write progress");
}

pub fn read_progress(root: &Path) -> String {
    fs::read_to_string(root.join("push_progress.txt")).expect("read progress")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("valid time")
}
