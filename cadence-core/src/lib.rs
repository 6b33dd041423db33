//! Cadence core library: domain types, plan and progress documents,
//! settings, scheduling, and the commit message heuristic.
//!
//! - [`types`]: day numbers, plan entries, progress record
//! - [`plan`] / [`progress`]: text document parsing and persistence
//! - [`config`]: `cadence.yaml` settings
//! - [`schedule`]: [`decide`] the next action from the progress record
//! - [`message`]: [`commit_message`] from a batch of paths

pub mod config;
pub mod error;
pub mod message;
pub mod plan;
pub mod progress;
pub mod schedule;
pub mod types;

pub use config::Settings;
pub use error::{ConfigError, PlanError, ProgressError};
pub use message::commit_message;
pub use schedule::{decide, NextAction};
pub use types::{DayEntry, DayNumber, DistributionPlan, FileChange, ProgressRecord};
