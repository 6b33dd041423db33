//! Next-action decision.
//!
//! [`decide`] is a pure function of the progress record and today's date; the
//! caller persists whatever the run produces.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{DayNumber, ProgressRecord};

/// What today's invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    /// Today's push already succeeded.
    AlreadyPublished,
    /// The last push failed; attempt the same day again.
    Retry { day: DayNumber },
    /// Every day of the window has been published.
    CycleComplete,
    /// Publish `day`.
    Proceed { day: DayNumber },
}

impl NextAction {
    /// The day this action would publish, if any.
    pub fn target_day(&self) -> Option<DayNumber> {
        match self {
            NextAction::Retry { day } | NextAction::Proceed { day } => Some(*day),
            NextAction::AlreadyPublished | NextAction::CycleComplete => None,
        }
    }

    /// Whether the run stops without touching the repository.
    pub fn is_terminal(&self) -> bool {
        self.target_day().is_none()
    }
}

/// Decide the next action for `today`.
///
/// Precedence:
/// 1. pushed successfully today → `AlreadyPublished`
/// 2. failed today, or failed on an earlier date → `Retry` the same day
/// 3. no push recorded yet → the recorded day itself (day 1 by default)
/// 4. otherwise the day after the recorded one
///
/// Any target beyond `total_days` is `CycleComplete`.
pub fn decide(progress: &ProgressRecord, today: NaiveDate) -> NextAction {
    let (target, retry) = match progress.last_push_date {
        Some(date) if date == today && progress.last_push_success => {
            return NextAction::AlreadyPublished;
        }
        Some(_) if !progress.last_push_success => (progress.day_number, true),
        Some(_) => (progress.day_number.next(), false),
        None => (progress.day_number, false),
    };

    if target.0 > progress.total_days {
        return NextAction::CycleComplete;
    }
    if retry {
        NextAction::Retry { day: target }
    } else {
        NextAction::Proceed { day: target }
    }
}
