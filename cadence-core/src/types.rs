//! Domain types for Cadence.
//!
//! Plan paths stay `String` with `/` separators: they are repository-relative
//! git pathspecs, not host filesystem paths.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Length of the publishing window.
pub const DEFAULT_TOTAL_DAYS: u32 = 30;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A 1-based day index within the publishing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayNumber(pub u32);

impl DayNumber {
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for DayNumber {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}", self.0)
    }
}

impl From<u32> for DayNumber {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

// ---------------------------------------------------------------------------
// Distribution plan
// ---------------------------------------------------------------------------

/// One block of the distribution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: DayNumber,
    /// File count written on the day header by the plan generator.
    pub declared_count: usize,
    pub files: Vec<String>,
}

/// The full day-to-files plan, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub days: Vec<DayEntry>,
}

impl DistributionPlan {
    /// Look up the block for `day`.
    pub fn day(&self, day: DayNumber) -> Result<&DayEntry, PlanError> {
        self.days
            .iter()
            .find(|entry| entry.day == day)
            .ok_or(PlanError::DayNotFound { day })
    }

    /// Number of files listed across every day.
    pub fn total_files(&self) -> usize {
        self.days.iter().map(|entry| entry.files.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Progress record
// ---------------------------------------------------------------------------

/// Persisted summary of the last run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub last_push_date: Option<NaiveDate>,
    pub last_push_time: Option<NaiveTime>,
    pub last_push_success: bool,
    /// Last completed or attempted day.
    pub day_number: DayNumber,
    pub total_days: u32,
    /// Cumulative files published.
    pub files_pushed: u32,
    /// Informational; written once by the setup step.
    pub total_files: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            last_push_date: None,
            last_push_time: None,
            last_push_success: false,
            day_number: DayNumber::default(),
            total_days: DEFAULT_TOTAL_DAYS,
            files_pushed: 0,
            total_files: 0,
        }
    }
}

impl ProgressRecord {
    /// Record a run outcome for `day`, stamped with `now`.
    ///
    /// `day_number` and `files_pushed` never decrease. `files_added` is only
    /// counted when the push succeeded.
    pub fn record_outcome(
        &mut self,
        day: DayNumber,
        success: bool,
        files_added: usize,
        now: NaiveDateTime,
    ) {
        self.last_push_date = Some(now.date());
        self.last_push_time = Some(now.time());
        self.last_push_success = success;
        self.day_number = self.day_number.max(day);
        if success {
            let added = u32::try_from(files_added).unwrap_or(u32::MAX);
            self.files_pushed = self.files_pushed.saturating_add(added);
        }
    }
}

// ---------------------------------------------------------------------------
// File classification
// ---------------------------------------------------------------------------

/// How a planned file relates to the repository right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChange {
    Untracked,
    ModifiedTracked,
    UnchangedTracked,
    Missing,
}

impl FileChange {
    /// Whether the file should be staged this run.
    pub fn needs_staging(self) -> bool {
        matches!(self, FileChange::Untracked | FileChange::ModifiedTracked)
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileChange::Untracked => write!(f, "untracked"),
            FileChange::ModifiedTracked => write!(f, "modified"),
            FileChange::UnchangedTracked => write!(f, "committed"),
            FileChange::Missing => write!(f, "missing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    #[test]
    fn day_number_display() {
        assert_eq!(DayNumber(5).to_string(), "Day 5");
        assert_eq!(DayNumber::default(), DayNumber(1));
    }

    #[test]
    fn plan_day_lookup() {
        let plan = DistributionPlan {
            days: vec![DayEntry {
                day: DayNumber(2),
                declared_count: 1,
                files: vec!["a.txt".into()],
            }],
        };
        assert_eq!(plan.day(DayNumber(2)).unwrap().files, vec!["a.txt"]);
        assert!(matches!(
            plan.day(DayNumber(3)),
            Err(PlanError::DayNotFound { day: DayNumber(3) })
        ));
    }

    #[test]
    fn success_adds_files_and_stamps_time() {
        let mut record = ProgressRecord {
            files_pushed: 4,
            ..Default::default()
        };
        record.record_outcome(DayNumber(2), true, 3, at("2026-03-02", "09:15:00"));
        assert_eq!(record.files_pushed, 7);
        assert_eq!(record.day_number, DayNumber(2));
        assert!(record.last_push_success);
        assert_eq!(record.last_push_date.unwrap().to_string(), "2026-03-02");
    }

    #[test]
    fn failure_keeps_counts() {
        let mut record = ProgressRecord {
            files_pushed: 4,
            ..Default::default()
        };
        record.record_outcome(DayNumber(2), false, 3, at("2026-03-02", "09:15:00"));
        assert_eq!(record.files_pushed, 4);
        assert_eq!(record.day_number, DayNumber(2));
        assert!(!record.last_push_success);
    }

    #[test]
    fn day_number_never_decreases() {
        let mut record = ProgressRecord {
            day_number: DayNumber(9),
            ..Default::default()
        };
        record.record_outcome(DayNumber(4), true, 0, at("2026-03-02", "09:15:00"));
        assert_eq!(record.day_number, DayNumber(9));
    }

    #[test]
    fn staging_classification() {
        assert!(FileChange::Untracked.needs_staging());
        assert!(FileChange::ModifiedTracked.needs_staging());
        assert!(!FileChange::UnchangedTracked.needs_staging());
        assert!(!FileChange::Missing.needs_staging());
    }
}
