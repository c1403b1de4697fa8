//! Goal status and progress - derived values, recomputed on every read.
//!
//! A goal has no stored status. Completion, overdue state and the days left
//! before the deadline are pure functions of the goal and the current time.

use crate::entities::Goal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::fmt;

/// Milliseconds in a day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Derived state of a goal at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStatus {
    /// Saved amount has reached the target
    pub is_complete: bool,
    /// Deadline has passed and the goal is not complete
    pub is_overdue: bool,
    /// Whole days until the deadline, rounded up, never negative
    pub time_left_days: i64,
}

impl GoalStatus {
    /// The one label that applies, by priority: complete, overdue, days left.
    #[must_use]
    pub const fn label(&self) -> StatusLabel {
        if self.is_complete {
            StatusLabel::Completed
        } else if self.is_overdue {
            StatusLabel::Overdue
        } else {
            StatusLabel::DaysLeft(self.time_left_days)
        }
    }
}

/// Display label for a goal's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    /// Target reached (even if the deadline has passed)
    Completed,
    /// Deadline passed before the target was reached
    Overdue,
    /// Still running with this many days to go
    DaysLeft(i64),
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("✅ Completed"),
            Self::Overdue => f.write_str("❌ Overdue"),
            Self::DaysLeft(days) => write!(f, "{days} days left"),
        }
    }
}

/// The instant a deadline date falls on: midnight UTC at the start of that day.
#[must_use]
pub fn deadline_instant(deadline: NaiveDate) -> DateTime<Utc> {
    deadline.and_time(NaiveTime::MIN).and_utc()
}

/// Computes completion, overdue state and days left for `goal` at `now`.
#[must_use]
pub fn compute_status(goal: &Goal, now: DateTime<Utc>) -> GoalStatus {
    let deadline = deadline_instant(goal.deadline);
    let is_complete = goal.is_complete();
    let is_overdue = now > deadline && !is_complete;

    let remaining_ms = (deadline - now).num_milliseconds();
    let time_left_days = div_ceil(remaining_ms, MILLIS_PER_DAY).max(0);

    GoalStatus {
        is_complete,
        is_overdue,
        time_left_days,
    }
}

/// Saved amount as a percentage of the target.
///
/// Not clamped: overshooting gives more than 100 and a negative saved amount gives a
/// negative value. A target that is zero, negative or not a number gives 0.
#[must_use]
pub fn compute_progress(goal: &Goal) -> f64 {
    if goal.target_amount > 0.0 {
        goal.saved_amount / goal.target_amount * 100.0
    } else {
        0.0
    }
}

/// Integer division rounding towards positive infinity.
const fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    if numerator.rem_euclid(denominator) > 0 {
        quotient + 1
    } else {
        quotient
    }
}
