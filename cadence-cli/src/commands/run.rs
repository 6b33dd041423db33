//! `cadence` — run today's publishing step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use cadence_sync::{run_day, GitCli, RunOutcome, RunReport, RunRequest, SyncOutcome};

/// Arguments for the default action.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Remote URL to configure when the remote has none.
    pub remote_url: Option<String>,

    /// Repository root.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Show what today's run would commit without touching the repository.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        tracing::debug!("repository root: {}", self.repo.display());
        let vcs = GitCli::new(&self.repo);
        let request = RunRequest {
            root: self.repo.clone(),
            remote_url: self.remote_url,
            dry_run: self.dry_run,
            now: Local::now().naive_local(),
        };

        let report = run_day(&vcs, &request)
            .with_context(|| format!("daily publish failed in {}", self.repo.display()))?;
        print_report(&report);
        Ok(())
    }
}

fn ok() -> String {
    "✓".green().to_string()
}

fn warn() -> String {
    "!".yellow().bold().to_string()
}

fn print_report(report: &RunReport) {
    let day = report
        .day
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".to_string());

    match &report.outcome {
        RunOutcome::AlreadyPublished => {
            println!("{} already published today; nothing to do", ok());
            return;
        }
        RunOutcome::CycleComplete => {
            println!("{} publishing window complete; nothing left to do", ok());
            return;
        }
        RunOutcome::Preview {
            files,
            used_fallback,
            message,
        } => {
            match message {
                Some(message) => println!(
                    "[dry-run] {day}: would commit {} file(s): {message}",
                    files.len()
                ),
                None => println!("[dry-run] {day}: nothing to commit"),
            }
            if *used_fallback {
                println!("  (no planned files pending; untracked files used instead)");
            }
            for path in files {
                println!("  ~  {path}");
            }
        }
        RunOutcome::DayAdvanced => {
            println!("{} {day} already committed; day recorded", ok());
        }
        RunOutcome::NoOp => {
            println!("{} {day}: nothing to publish", ok());
        }
        RunOutcome::Published { branch } => {
            let message = report
                .publish
                .as_ref()
                .and_then(|p| p.commit_message.as_deref())
                .unwrap_or("pending commits");
            println!("{} {day} published to {branch}: {message}", ok());
        }
        RunOutcome::PushFailed { reason } => {
            println!("{} {day} committed locally but not pushed: {reason}", warn());
            println!("  run cadence again to retry");
        }
    }

    if let Some(resolution) = &report.resolution {
        for path in &resolution.skipped {
            println!("  ·  {path} (already committed)");
        }
        for path in &resolution.missing {
            println!("  {}  {path} (missing on disk)", warn());
        }
        for path in &resolution.unreadable {
            println!("  {}  {path} (status unreadable)", warn());
        }
    }

    if let Some(publish) = &report.publish {
        for path in &publish.staged {
            println!("  +  {path}");
        }
        match &publish.sync {
            Some(SyncOutcome::ConflictsResolved { paths }) => {
                println!("  {} kept local versions of {} conflicted file(s)", ok(), paths.len());
            }
            Some(SyncOutcome::ConflictsLeft { paths, .. }) => {
                println!(
                    "  {} {} conflicted file(s) need manual resolution",
                    warn(),
                    paths.len()
                );
            }
            _ => {}
        }
        for warning in &publish.warnings {
            println!("  {}  {warning}", warn());
        }
    }
}
