//! Goal entity - a savings target with a deadline and the amount put aside so far.
//!
//! Field names follow the persistence service's JSON (`targetAmount`, `savedAmount`,
//! `createdAt`). Amounts written by form-driven clients may arrive as numeric strings,
//! so they are decoded leniently; anything that is not a number is a decode error.

use crate::core::draft::parse_amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque goal identifier assigned by the persistence service.
///
/// Services hand out either strings or integers; both decode into the same
/// textual form, which is what appears in `/goals/{id}` paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GoalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for GoalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// Decodes an amount given either as a JSON number or as numeric text.
fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => Ok(n),
        RawAmount::Text(s) => parse_amount(&s).map_err(serde::de::Error::custom),
    }
}

/// A persisted savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier, assigned by the persistence service
    pub id: GoalId,
    /// Human-readable label (e.g., "Emergency fund")
    pub name: String,
    /// Amount to reach
    #[serde(deserialize_with = "deserialize_amount")]
    pub target_amount: f64,
    /// Free-text grouping label (e.g., "travel")
    pub category: String,
    /// Date by which the target should be reached
    pub deadline: NaiveDate,
    /// Amount accumulated so far
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub saved_amount: f64,
    /// When the goal was submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Whether the saved amount has reached the target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.saved_amount >= self.target_amount
    }
}

/// Body of `POST /goals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// Goal label
    pub name: String,
    /// Amount to reach
    pub target_amount: f64,
    /// Grouping label
    pub category: String,
    /// Date by which the target should be reached
    pub deadline: NaiveDate,
    /// Always zero at creation
    pub saved_amount: f64,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl NewGoal {
    /// Turns the request into a stored record under the given identifier.
    #[must_use]
    pub fn into_goal(self, id: GoalId) -> Goal {
        Goal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            category: self.category,
            deadline: self.deadline,
            saved_amount: self.saved_amount,
            created_at: Some(self.created_at),
        }
    }
}

/// Body of `PATCH /goals/{id}`: only the fields being changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    /// New label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    /// New grouping label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    /// New saved amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_amount: Option<f64>,
}

impl GoalPatch {
    /// A patch that only sets the saved amount.
    #[must_use]
    pub fn saved_amount(amount: f64) -> Self {
        Self {
            saved_amount: Some(amount),
            ..Self::default()
        }
    }

    /// Shallow merge: every field present in the patch overwrites the goal's.
    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(name) = &self.name {
            goal.name.clone_from(name);
        }
        if let Some(target_amount) = self.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(category) = &self.category {
            goal.category.clone_from(category);
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = deadline;
        }
        if let Some(saved_amount) = self.saved_amount {
            goal.saved_amount = saved_amount;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_goal_decodes_numeric_fields() {
        let goal: Goal = serde_json::from_value(json!({
            "id": "a1",
            "name": "Vacation",
            "targetAmount": 1500,
            "category": "travel",
            "deadline": "2025-08-01",
            "savedAmount": 200.5,
            "createdAt": "2025-01-10T09:30:00.000Z"
        }))
        .unwrap();

        assert_eq!(goal.id.as_str(), "a1");
        assert_eq!(goal.target_amount, 1500.0);
        assert_eq!(goal.saved_amount, 200.5);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert!(goal.created_at.is_some());
    }

    #[test]
    fn test_goal_decodes_string_amounts_and_integer_id() {
        let goal: Goal = serde_json::from_value(json!({
            "id": 7,
            "name": "Laptop",
            "targetAmount": "1200",
            "category": "tech",
            "deadline": "2025-12-24",
            "savedAmount": 0
        }))
        .unwrap();

        assert_eq!(goal.id, GoalId::from("7"));
        assert_eq!(goal.target_amount, 1200.0);
        assert_eq!(goal.saved_amount, 0.0);
        assert!(goal.created_at.is_none());
    }

    #[test]
    fn test_goal_rejects_non_numeric_amount() {
        let result: std::result::Result<Goal, _> = serde_json::from_value(json!({
            "id": "x",
            "name": "Bike",
            "targetAmount": "lots",
            "category": "sport",
            "deadline": "2025-12-24",
            "savedAmount": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let body = serde_json::to_value(GoalPatch::saved_amount(150.0)).unwrap();
        assert_eq!(body, json!({ "savedAmount": 150.0 }));
    }

    #[test]
    fn test_patch_apply_is_shallow_merge() {
        let mut goal: Goal = serde_json::from_value(json!({
            "id": "g",
            "name": "Car",
            "targetAmount": 5000,
            "category": "auto",
            "deadline": "2026-03-01",
            "savedAmount": 100
        }))
        .unwrap();

        let patch = GoalPatch {
            name: Some("New car".to_string()),
            saved_amount: Some(250.0),
            ..GoalPatch::default()
        };
        patch.apply_to(&mut goal);

        assert_eq!(goal.name, "New car");
        assert_eq!(goal.saved_amount, 250.0);
        assert_eq!(goal.target_amount, 5000.0);
        assert_eq!(goal.category, "auto");
    }

    #[test]
    fn test_new_goal_body_uses_service_field_names() {
        let new_goal = NewGoal {
            name: "Fund".to_string(),
            target_amount: 1000.0,
            category: "safety".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            saved_amount: 0.0,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        };
        let body = serde_json::to_value(&new_goal).unwrap();

        assert_eq!(body["targetAmount"], json!(1000.0));
        assert_eq!(body["savedAmount"], json!(0.0));
        assert_eq!(body["deadline"], json!("2025-06-30"));
        assert!(body.get("createdAt").is_some());
    }
}
