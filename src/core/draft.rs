//! Draft handling - the transient form state behind "add goal" and "deposit".
//!
//! Drafts hold raw text exactly as typed. The presence checks mirror a form that
//! refuses to submit while a field is blank; the parse step turns the text into
//! typed values and reports malformed numbers or dates instead of letting them
//! leak into arithmetic.

use crate::{
    entities::{GoalId, NewGoal},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};

/// Date format of the deadline field
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Parses user-entered text as a finite amount.
///
/// Surrounding whitespace is ignored. Empty text, non-numeric text and values
/// such as `inf` or `NaN` are rejected with [`Error::InvalidAmount`].
pub fn parse_amount(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidAmount {
            input: input.to_string(),
        }),
    }
}

/// Parses user-entered text as a `YYYY-MM-DD` deadline.
pub fn parse_deadline(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DEADLINE_FORMAT).map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Pending "new goal" form. Every field starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGoalDraft {
    /// Goal label
    pub name: String,
    /// Target amount as typed
    pub target_amount: String,
    /// Grouping label
    pub category: String,
    /// Deadline as typed (`YYYY-MM-DD`)
    pub deadline: String,
}

impl NewGoalDraft {
    /// Builds a draft from the four form fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        target_amount: impl Into<String>,
        category: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_amount: target_amount.into(),
            category: category.into(),
            deadline: deadline.into(),
        }
    }

    /// Presence check: all four fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.target_amount.is_empty()
            && !self.category.is_empty()
            && !self.deadline.is_empty()
    }

    /// Turns the draft into the creation request, stamped with `now`.
    ///
    /// The saved amount always starts at zero.
    pub fn parse(&self, now: DateTime<Utc>) -> Result<NewGoal> {
        let target_amount = parse_amount(&self.target_amount)?;
        let deadline = parse_deadline(&self.deadline)?;

        Ok(NewGoal {
            name: self.name.clone(),
            target_amount,
            category: self.category.clone(),
            deadline,
            saved_amount: 0.0,
            created_at: now,
        })
    }

    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Pending deposit form: which goal, and how much.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositDraft {
    /// Identifier of the goal receiving the deposit (empty when none is selected)
    pub goal_id: String,
    /// Amount as typed
    pub amount: String,
}

impl DepositDraft {
    /// Builds a draft for the given goal and amount text.
    #[must_use]
    pub fn new(goal_id: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            goal_id: goal_id.into(),
            amount: amount.into(),
        }
    }

    /// Selected goal, if any.
    #[must_use]
    pub fn goal_id(&self) -> Option<GoalId> {
        (!self.goal_id.is_empty()).then(|| GoalId::new(self.goal_id.clone()))
    }

    /// Presence check on the amount field.
    #[must_use]
    pub fn has_amount(&self) -> bool {
        !self.amount.is_empty()
    }

    /// Parses the amount field.
    pub fn parse_amount(&self) -> Result<f64> {
        parse_amount(&self.amount)
    }

    /// Resets both fields to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
