//! Error types for cadence-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DayNumber;

/// Errors from reading the distribution plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan document does not exist. Produced by the external setup step.
    #[error("distribution plan not found at {path}; run the plan generator first")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the plan.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plan has no block for the requested day.
    #[error("no block for {day} in the distribution plan")]
    DayNotFound { day: DayNumber },
}

/// Errors from reading or writing the progress record.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading `cadence.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with file path and serde_yaml's line context.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
