//! Day-run pipeline: setup checks, decision, resolution, publish, record.
//!
//! This is the single entrypoint the CLI calls. The progress record is read
//! once at the start and written once at the end.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use cadence_core::{
    config, decide, message, plan, progress, DayNumber, NextAction, ProgressRecord, Settings,
};

use crate::error::{SetupError, SyncError};
use crate::publish::{PublishEnd, PublishInput, PublishReport, Publisher};
use crate::resolve::{self, Resolution};
use crate::vcs::VersionControl;

/// Parameters for one invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Repository root; plan, progress, and settings resolve against it.
    pub root: PathBuf,
    /// Remote URL to configure when the remote has none.
    pub remote_url: Option<String>,
    /// Resolve and report only; no staging, commit, push, or record.
    pub dry_run: bool,
    /// Local date and time of the run.
    pub now: NaiveDateTime,
}

impl RunRequest {
    pub fn new(root: impl Into<PathBuf>, now: NaiveDateTime) -> Self {
        Self {
            root: root.into(),
            remote_url: None,
            dry_run: false,
            now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Today's push already succeeded.
    AlreadyPublished,
    /// All days of the window are done.
    CycleComplete,
    /// Dry run: what would be committed.
    Preview {
        files: Vec<String>,
        used_fallback: bool,
        message: Option<String>,
    },
    /// Day's files were already committed; day recorded without a commit.
    DayAdvanced,
    /// Nothing to stage and nothing to record.
    NoOp,
    /// Committed and pushed.
    Published { branch: String },
    /// Committed locally; push failed and was recorded for a retry.
    PushFailed { reason: String },
}

/// Everything a run did, for printing.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub decision: NextAction,
    pub day: Option<DayNumber>,
    pub declared_count: Option<usize>,
    pub resolution: Option<ResolutionSummary>,
    pub publish: Option<PublishReport>,
    pub outcome: RunOutcome,
    /// The record as written, when the run wrote one.
    pub record: Option<ProgressRecord>,
}

/// Serializable view of [`Resolution`].
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionSummary {
    pub candidates: Vec<String>,
    pub skipped: Vec<String>,
    pub missing: Vec<String>,
    pub unreadable: Vec<String>,
}

impl From<&Resolution> for ResolutionSummary {
    fn from(r: &Resolution) -> Self {
        Self {
            candidates: r.candidates.clone(),
            skipped: r.skipped.clone(),
            missing: r.missing.clone(),
            unreadable: r.unreadable.clone(),
        }
    }
}

impl RunReport {
    fn terminal(decision: NextAction, outcome: RunOutcome) -> Self {
        Self {
            decision,
            day: None,
            declared_count: None,
            resolution: None,
            publish: None,
            outcome,
            record: None,
        }
    }
}

// ---------------------------------------------------------------------------
// run_day
// ---------------------------------------------------------------------------

/// Run today's step against the repository at `request.root`.
pub fn run_day(vcs: &dyn VersionControl, request: &RunRequest) -> Result<RunReport, SyncError> {
    let root = request.root.as_path();

    // 1. Setup.
    if !vcs.is_repository() {
        return Err(SetupError::NotARepository {
            path: root.to_path_buf(),
        }
        .into());
    }
    let settings = config::load_at(root)?;

    // 2. Decide.
    let progress_path = settings.progress_path(root);
    let mut record = load_progress(root, &settings)?;
    let decision = decide(&record, request.today());
    let day = match decision {
        NextAction::AlreadyPublished => {
            tracing::info!("already published today; nothing to do");
            return Ok(RunReport::terminal(decision, RunOutcome::AlreadyPublished));
        }
        NextAction::CycleComplete => {
            tracing::info!("all {} days published", record.total_days);
            return Ok(RunReport::terminal(decision, RunOutcome::CycleComplete));
        }
        NextAction::Retry { day } => {
            tracing::info!("retrying {day} after a failed push");
            day
        }
        NextAction::Proceed { day } => {
            tracing::info!("publishing {day} of {}", record.total_days);
            day
        }
    };
    if !request.dry_run {
        ensure_remote(vcs, &settings, request.remote_url.as_deref())?;
    }

    // 3. Plan.
    let plan_path = settings.plan_path(root);
    if !plan_path.exists() {
        return Err(SetupError::PlanMissing { path: plan_path }.into());
    }
    let distribution = plan::load_at(&plan_path)?;
    let entry = distribution.day(day)?;
    if entry.declared_count != entry.files.len() {
        tracing::warn!(
            "{day} declares {} file(s) but lists {}",
            entry.declared_count,
            entry.files.len()
        );
    }

    // 4. Resolve.
    let resolution = resolve::resolve_day(vcs, root, &entry.files);
    let retry = matches!(decision, NextAction::Retry { .. });
    let mut report = RunReport {
        decision,
        day: Some(day),
        declared_count: Some(entry.declared_count),
        resolution: Some(ResolutionSummary::from(&resolution)),
        publish: None,
        outcome: RunOutcome::NoOp,
        record: None,
    };

    if request.dry_run {
        report.outcome = preview(vcs, &settings, &resolution, retry)?;
        return Ok(report);
    }

    // 5. Publish.
    let input = PublishInput {
        candidates: resolution.candidates.clone(),
        skipped: resolution.skipped.len(),
        retry,
    };
    let published = Publisher::new(vcs, &settings, input).run()?;

    // 6. Record.
    let files_added = published.staged.len();
    let outcome = match &published.end {
        PublishEnd::Published { branch } => {
            record.record_outcome(day, true, files_added, request.now);
            RunOutcome::Published {
                branch: branch.clone(),
            }
        }
        PublishEnd::PushFailed { reason } => {
            record.record_outcome(day, false, files_added, request.now);
            RunOutcome::PushFailed {
                reason: reason.clone(),
            }
        }
        PublishEnd::NothingStaged { advance_day: true } => {
            tracing::info!("{day} files already committed; recording the day as done");
            record.record_outcome(day, true, 0, request.now);
            RunOutcome::DayAdvanced
        }
        PublishEnd::NothingStaged { advance_day: false } => {
            tracing::info!("nothing to publish for {day}");
            RunOutcome::NoOp
        }
    };

    if outcome != RunOutcome::NoOp {
        progress::save_at(&progress_path, &record)?;
        report.record = Some(record);
    }
    report.publish = Some(published);
    report.outcome = outcome;
    Ok(report)
}

/// Load the progress record for `root`. A `total_days` set in `cadence.yaml`
/// overrides the record's `TotalDays`, and is written back with the record.
pub fn load_progress(root: &Path, settings: &Settings) -> Result<ProgressRecord, SyncError> {
    let mut record = progress::load_at(&settings.progress_path(root))?;
    if let Some(total_days) = settings.total_days {
        record.total_days = total_days;
    }
    Ok(record)
}

fn ensure_remote(
    vcs: &dyn VersionControl,
    settings: &Settings,
    url: Option<&str>,
) -> Result<(), SyncError> {
    if vcs.remote_url(&settings.remote)?.is_some() {
        return Ok(());
    }
    match url {
        Some(url) => {
            tracing::info!("configuring remote {} → {url}", settings.remote);
            vcs.add_remote(&settings.remote, url)?;
        }
        None => tracing::warn!(
            "remote '{}' is not configured and no URL was given; the push will fail",
            settings.remote
        ),
    }
    Ok(())
}

fn preview(
    vcs: &dyn VersionControl,
    settings: &Settings,
    resolution: &Resolution,
    retry: bool,
) -> Result<RunOutcome, SyncError> {
    let pending_retry = retry && !resolution.skipped.is_empty();
    let (files, used_fallback) = if !resolution.candidates.is_empty() || pending_retry {
        (resolution.candidates.clone(), false)
    } else {
        let fallback = resolve::fallback_candidates(
            vcs,
            &settings.bookkeeping_files(),
            settings.fallback_batch,
        )?;
        (fallback, true)
    };
    let message = (!files.is_empty()).then(|| message::commit_message(&files));
    Ok(RunOutcome::Preview {
        used_fallback: used_fallback && !files.is_empty(),
        files,
        message,
    })
}
