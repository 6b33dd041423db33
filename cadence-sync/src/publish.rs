//! Publish state machine.
//!
//! ```text
//! Stage → Commit → AbortDangling → Sync → [ResolveConflicts] → Push → [FallbackPush] → Record
//! ```
//!
//! Every phase returns a [`Transition`]: advance, recover (log and continue
//! somewhere else), finish, or fail fatally. Only a commit failure, or a
//! repository that cannot list its files, is fatal; everything after the
//! commit degrades to a recorded soft failure. Force-push is never used.

use serde::Serialize;

use cadence_core::{commit_message, Settings};

use crate::error::SyncError;
use crate::resolve;
use crate::vcs::VersionControl;

/// Message for the commit that completes a local-wins merge.
pub const MERGE_MESSAGE: &str = "Merge remote changes, keeping local versions";

/// A named step of the publish sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Stage,
    Commit,
    AbortDangling,
    Sync,
    ResolveConflicts,
    Push,
    FallbackPush,
    Record,
}

/// Result of running one phase.
#[derive(Debug)]
pub enum Transition {
    /// The phase succeeded.
    Advance(Phase),
    /// The phase failed; the run continues at `next`.
    Recover { next: Phase, reason: String },
    /// The run ends without error.
    Finish(PublishEnd),
    /// The run ends with a non-zero exit and no progress update.
    Fatal(SyncError),
}

/// How the pull went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Merged,
    ConflictsResolved { paths: Vec<String> },
    /// Local-wins completion failed; left for manual resolution.
    ConflictsLeft { paths: Vec<String>, reason: String },
    Failed { reason: String },
}

/// Terminal state of a publish run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishEnd {
    Published { branch: String },
    /// Every push attempt failed; recorded as a soft failure.
    PushFailed { reason: String },
    /// Nothing could be staged. `advance_day` is set when the day's files
    /// were already committed, so the day counts as done.
    NothingStaged { advance_day: bool },
}

/// What the publish run did, for the caller to record and print.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub staged: Vec<String>,
    pub used_fallback: bool,
    pub commit_message: Option<String>,
    pub sync: Option<SyncOutcome>,
    pub end: PublishEnd,
    pub visited: Vec<Phase>,
    pub warnings: Vec<String>,
}

/// Per-run input to the state machine.
#[derive(Debug, Clone, Default)]
pub struct PublishInput {
    /// Planned files needing a commit, in plan order.
    pub candidates: Vec<String>,
    /// Planned files already committed.
    pub skipped: usize,
    /// The previous attempt at this day failed to push; publish pending
    /// commits even when nothing new can be staged.
    pub retry: bool,
}

/// Drives one run through the phases.
pub struct Publisher<'a> {
    vcs: &'a dyn VersionControl,
    settings: &'a Settings,
    input: PublishInput,
    staged: Vec<String>,
    used_fallback: bool,
    message: Option<String>,
    sync: Option<SyncOutcome>,
    pushed: Option<String>,
    push_error: Option<String>,
    visited: Vec<Phase>,
    warnings: Vec<String>,
}

impl<'a> Publisher<'a> {
    pub fn new(vcs: &'a dyn VersionControl, settings: &'a Settings, input: PublishInput) -> Self {
        Self {
            vcs,
            settings,
            input,
            staged: Vec::new(),
            used_fallback: false,
            message: None,
            sync: None,
            pushed: None,
            push_error: None,
            visited: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Run from [`Phase::Stage`] to a terminal transition.
    pub fn run(mut self) -> Result<PublishReport, SyncError> {
        let mut phase = Phase::Stage;
        loop {
            self.visited.push(phase);
            match self.step(phase) {
                Transition::Advance(next) => {
                    tracing::debug!("{phase:?} → {next:?}");
                    phase = next;
                }
                Transition::Recover { next, reason } => {
                    tracing::warn!("{phase:?} failed, continuing at {next:?}: {reason}");
                    self.warnings.push(reason);
                    phase = next;
                }
                Transition::Finish(end) => {
                    return Ok(PublishReport {
                        staged: self.staged,
                        used_fallback: self.used_fallback,
                        commit_message: self.message,
                        sync: self.sync,
                        end,
                        visited: self.visited,
                        warnings: self.warnings,
                    });
                }
                Transition::Fatal(err) => return Err(err),
            }
        }
    }

    /// Run a single phase.
    pub fn step(&mut self, phase: Phase) -> Transition {
        match phase {
            Phase::Stage => self.stage(),
            Phase::Commit => self.commit(),
            Phase::AbortDangling => self.abort_dangling(),
            Phase::Sync => self.pull(),
            Phase::ResolveConflicts => self.resolve_conflicts(),
            Phase::Push => self.push(),
            Phase::FallbackPush => self.fallback_push(),
            Phase::Record => self.record(),
        }
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    fn stage(&mut self) -> Transition {
        let candidates = self.input.candidates.clone();
        self.stage_all(&candidates);

        // On a retry, committed plan files are the earlier attempt's commit
        // waiting to be pushed; do not pad it with unrelated files.
        let pending_retry = self.input.retry && self.input.skipped > 0;
        if self.staged.is_empty() && !pending_retry {
            let exclude = self.settings.bookkeeping_files();
            let fallback = match resolve::fallback_candidates(
                self.vcs,
                &exclude,
                self.settings.fallback_batch,
            ) {
                Ok(paths) => paths,
                Err(e) => return Transition::Fatal(e.into()),
            };
            if !fallback.is_empty() {
                tracing::info!(
                    "no planned files to stage; publishing {} untracked file(s) instead",
                    fallback.len()
                );
                self.used_fallback = true;
                self.stage_all(&fallback);
            }
        }

        if !self.staged.is_empty() {
            return Transition::Advance(Phase::Commit);
        }
        if self.input.retry {
            tracing::info!("nothing new to commit; publishing pending local commits");
            return Transition::Advance(Phase::AbortDangling);
        }
        Transition::Finish(PublishEnd::NothingStaged {
            advance_day: self.input.skipped > 0,
        })
    }

    fn stage_all(&mut self, paths: &[String]) {
        for path in paths {
            match self.vcs.add(path) {
                Ok(()) => {
                    tracing::info!("staged {path}");
                    self.staged.push(path.clone());
                }
                Err(e) => {
                    let reason = format!("could not stage {path}: {e}");
                    tracing::warn!("{reason}");
                    self.warnings.push(reason);
                }
            }
        }
    }

    fn commit(&mut self) -> Transition {
        let message = commit_message(&self.staged);
        tracing::info!("committing {} file(s): {message}", self.staged.len());
        match self.vcs.commit(&message) {
            Ok(()) => {
                self.message = Some(message);
                Transition::Advance(Phase::AbortDangling)
            }
            Err(e) => Transition::Fatal(SyncError::CommitFailed(e)),
        }
    }

    fn abort_dangling(&mut self) -> Transition {
        match self.vcs.pending_operation() {
            Ok(None) => Transition::Advance(Phase::Sync),
            Ok(Some(op)) => match self.vcs.abort(op) {
                Ok(()) => {
                    tracing::info!("aborted a dangling {op}");
                    Transition::Advance(Phase::Sync)
                }
                Err(e) => Transition::Recover {
                    next: Phase::Sync,
                    reason: format!("could not abort dangling {op}: {e}"),
                },
            },
            Err(e) => Transition::Recover {
                next: Phase::Sync,
                reason: format!("could not inspect repository state: {e}"),
            },
        }
    }

    fn pull(&mut self) -> Transition {
        let remote = &self.settings.remote;
        let branch = &self.settings.main_branch;
        match self.vcs.pull(remote, branch) {
            Ok(()) => {
                self.sync = Some(SyncOutcome::Merged);
                Transition::Advance(Phase::Push)
            }
            Err(e) if e.is_conflict() || self.has_conflicts() => Transition::Recover {
                next: Phase::ResolveConflicts,
                reason: format!("pull from {remote}/{branch} hit conflicts"),
            },
            Err(e) => {
                let reason = if e.is_missing_remote_ref() {
                    format!("{remote}/{branch} does not exist yet")
                } else {
                    format!("pull from {remote}/{branch} failed: {e}")
                };
                self.sync = Some(SyncOutcome::Failed {
                    reason: reason.clone(),
                });
                Transition::Recover {
                    next: Phase::Push,
                    reason,
                }
            }
        }
    }

    fn has_conflicts(&self) -> bool {
        self.vcs
            .conflicted_paths()
            .map(|paths| !paths.is_empty())
            .unwrap_or(false)
    }

    fn resolve_conflicts(&mut self) -> Transition {
        let paths = self.vcs.conflicted_paths().unwrap_or_default();
        for path in &paths {
            let kept = self
                .vcs
                .checkout_ours(path)
                .and_then(|()| self.vcs.add(path));
            match kept {
                Ok(()) => tracing::info!("kept local version of {path}"),
                Err(e) => tracing::warn!("could not keep local version of {path}: {e}"),
            }
        }

        match self.vcs.commit(MERGE_MESSAGE) {
            Ok(()) => {
                self.sync = Some(SyncOutcome::ConflictsResolved { paths });
                Transition::Advance(Phase::Push)
            }
            Err(e) => {
                let reason = format!("merge left for manual resolution: {e}");
                self.sync = Some(SyncOutcome::ConflictsLeft {
                    paths,
                    reason: reason.clone(),
                });
                Transition::Recover {
                    next: Phase::Push,
                    reason,
                }
            }
        }
    }

    fn push(&mut self) -> Transition {
        let remote = &self.settings.remote;
        let branch = &self.settings.main_branch;
        match self.vcs.push(remote, branch) {
            Ok(()) => {
                self.pushed = Some(branch.clone());
                Transition::Advance(Phase::Record)
            }
            Err(e) => {
                let reason = format!("push to {remote}/{branch} failed: {e}");
                self.push_error = Some(reason.clone());
                let next = if e.is_rejected() || e.is_unknown_refspec() {
                    Phase::FallbackPush
                } else {
                    Phase::Record
                };
                Transition::Recover { next, reason }
            }
        }
    }

    fn fallback_push(&mut self) -> Transition {
        let remote = &self.settings.remote;
        let main = &self.settings.main_branch;
        let current = match self.vcs.current_branch() {
            Ok(branch) => branch,
            Err(e) => {
                return Transition::Recover {
                    next: Phase::Record,
                    reason: format!("could not determine current branch: {e}"),
                }
            }
        };

        if &current == main || current == "HEAD" {
            return Transition::Recover {
                next: Phase::Record,
                reason: format!("no fallback branch (current branch is {current})"),
            };
        }

        tracing::info!("retrying push with current branch {current}");
        match self.vcs.push(remote, &current) {
            Ok(()) => {
                self.pushed = Some(current);
                Transition::Advance(Phase::Record)
            }
            Err(e) => {
                let reason = format!("push to {remote}/{current} failed: {e}");
                self.push_error = Some(reason.clone());
                Transition::Recover {
                    next: Phase::Record,
                    reason,
                }
            }
        }
    }

    fn record(&mut self) -> Transition {
        match self.pushed.take() {
            Some(branch) => Transition::Finish(PublishEnd::Published { branch }),
            None => Transition::Finish(PublishEnd::PushFailed {
                reason: self
                    .push_error
                    .clone()
                    .unwrap_or_else(|| "push not attempted".to_string()),
            }),
        }
    }
}
