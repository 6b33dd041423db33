//! `cadence status` — progress summary and the next action.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use cadence_core::{config, decide, plan, NextAction, ProgressRecord};
use cadence_sync::load_progress;

/// Arguments for `cadence status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Repository root.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let report = build_report(&self.repo)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    day: u32,
    total_days: u32,
    last_push_date: Option<String>,
    last_push_time: Option<String>,
    last_push_success: bool,
    files_pushed: u32,
    total_files: u32,
    next: NextAction,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "field")]
    field: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

fn build_report(root: &Path) -> Result<StatusReport> {
    let settings = config::load_at(root)
        .with_context(|| format!("failed to load settings in {}", root.display()))?;
    let record: ProgressRecord =
        load_progress(root, &settings).context("failed to load progress record")?;

    // A record written before setup filled in TotalFiles still gets a total
    // when the plan is present.
    let plan_path = settings.plan_path(root);
    let total_files = if record.total_files == 0 && plan_path.exists() {
        let planned = plan::load_at(&plan_path).context("failed to load distribution plan")?;
        u32::try_from(planned.total_files()).unwrap_or(u32::MAX)
    } else {
        record.total_files
    };

    Ok(StatusReport {
        day: record.day_number.0,
        total_days: record.total_days,
        last_push_date: record.last_push_date.map(|d| d.to_string()),
        last_push_time: record.last_push_time.map(|t| t.format("%H:%M:%S").to_string()),
        last_push_success: record.last_push_success,
        files_pushed: record.files_pushed,
        total_files,
        next: decide(&record, Local::now().date_naive()),
    })
}

fn print_table(report: &StatusReport) {
    println!(
        "Cadence v{} | day {} of {} | {} of {} files published",
        env!("CARGO_PKG_VERSION"),
        report.day,
        report.total_days,
        report.files_pushed,
        report.total_files,
    );

    let last_push = match (&report.last_push_date, &report.last_push_time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(date), None) => date.clone(),
        _ => "never".to_string(),
    };
    let result = if report.last_push_date.is_none() {
        "-"
    } else if report.last_push_success {
        "succeeded"
    } else {
        "failed"
    };

    let rows = vec![
        StatusTableRow {
            field: "day",
            value: format!("{} / {}", report.day, report.total_days),
        },
        StatusTableRow {
            field: "last push",
            value: last_push,
        },
        StatusTableRow {
            field: "result",
            value: result.to_string(),
        },
        StatusTableRow {
            field: "files",
            value: format!("{} / {}", report.files_pushed, report.total_files),
        },
        StatusTableRow {
            field: "next",
            value: next_label(&report.next),
        },
    ];
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if let NextAction::Retry { day } = report.next {
        println!(
            "{} last push failed; the next run retries {day}",
            "!".yellow().bold()
        );
    }
}

fn next_label(next: &NextAction) -> String {
    match next {
        NextAction::AlreadyPublished => "done for today".to_string(),
        NextAction::CycleComplete => "window complete".to_string(),
        NextAction::Retry { day } => format!("retry {day}"),
        NextAction::Proceed { day } => format!("publish {day}"),
    }
}
