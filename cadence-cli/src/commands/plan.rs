//! `cadence plan` — preview a day of the distribution plan.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;

use cadence_core::{commit_message, config, decide, plan, DayNumber};
use cadence_sync::load_progress;

/// Arguments for `cadence plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Day to show (defaults to the day the next run would publish).
    #[arg(long)]
    pub day: Option<u32>,

    /// Repository root.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DayPreview {
    day: u32,
    declared_count: usize,
    files: Vec<String>,
    message: Option<String>,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let settings = config::load_at(&self.repo)
            .with_context(|| format!("failed to load settings in {}", self.repo.display()))?;

        let day = match self.day {
            Some(n) => DayNumber(n),
            None => {
                let record =
                    load_progress(&self.repo, &settings).context("failed to load progress record")?;
                match decide(&record, Local::now().date_naive()).target_day() {
                    Some(day) => day,
                    None if record.day_number.0 < record.total_days => record.day_number.next(),
                    None => bail!("publishing window complete; pass --day to inspect a day"),
                }
            }
        };

        let planned = plan::load_at(&settings.plan_path(&self.repo))
            .context("failed to load distribution plan")?;
        let entry = planned.day(day)?;
        let preview = DayPreview {
            day: day.0,
            declared_count: entry.declared_count,
            files: entry.files.clone(),
            message: (!entry.files.is_empty()).then(|| commit_message(&entry.files)),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&preview).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        println!(
            "{day} ({} declared, {} listed)",
            preview.declared_count,
            preview.files.len()
        );
        for path in &preview.files {
            println!("  ·  {path}");
        }
        match &preview.message {
            Some(message) => println!("message: {message}"),
            None => println!("nothing planned"),
        }
        Ok(())
    }
}
