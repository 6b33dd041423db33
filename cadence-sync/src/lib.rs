//! # cadence-sync
//!
//! Repository side of Cadence: the version-control collaborator, file
//! resolution, the publish state machine, and the day-run pipeline.
//!
//! Call [`run_day`] with a [`GitCli`] (or any [`VersionControl`]) to run
//! today's step.

pub mod error;
pub mod git;
pub mod pipeline;
pub mod publish;
pub mod resolve;
pub mod vcs;

pub use error::{SetupError, SyncError, VcsError};
pub use git::GitCli;
pub use pipeline::{load_progress, run_day, RunOutcome, RunReport, RunRequest};
pub use publish::{PublishEnd, PublishReport, SyncOutcome};
pub use vcs::{PathStatus, PendingOperation, VersionControl};
