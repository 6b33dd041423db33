//! Cadence — publish a planned slice of a repository each day.
//!
//! # Usage
//!
//! ```text
//! cadence [REMOTE_URL] [--repo <dir>] [--dry-run]
//! cadence status [--repo <dir>] [--json]
//! cadence plan [--day N] [--repo <dir>] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, run::RunArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cadence",
    version,
    about = "Publish a pre-planned slice of a repository each day",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the progress record and what the next run will do.
    Status(StatusArgs),

    /// Show a day's planned files and the commit message they would get.
    Plan(PlanArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Status(args)) => args.run(),
        Some(Commands::Plan(args)) => args.run(),
        None => cli.run.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
