//! Shared test utilities for the goal planner.
//!
//! This module provides an in-memory persistence service with failure injection and
//! helper functions for building goals and stores with sensible defaults.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::{
    api::GoalBackend,
    entities::{Goal, GoalId, GoalPatch, NewGoal},
    errors::{Error, Result},
    store::{GoalStore, MutationPolicy},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// A call received by [`InMemoryBackend`], recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `GET /goals`
    List,
    /// `POST /goals`
    Create(NewGoal),
    /// `PATCH /goals/{id}`
    Patch(GoalId, GoalPatch),
    /// `DELETE /goals/{id}`
    Delete(GoalId),
}

#[derive(Debug, Default)]
struct BackendState {
    goals: Vec<Goal>,
    next_id: u64,
    failing: bool,
    calls: Vec<BackendCall>,
}

/// Persistence service kept in memory.
///
/// While failing is switched on every call is recorded and then answered with a
/// 503 without touching the stored goals.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    /// Backend pre-populated with `goals`.
    pub fn with_goals(goals: Vec<Goal>) -> Self {
        let next_id = goals.len() as u64 + 1;
        Self {
            state: Mutex::new(BackendState {
                goals,
                next_id,
                ..BackendState::default()
            }),
        }
    }

    /// Switches failure injection on or off.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Goals as the service currently stores them.
    pub fn stored_goals(&self) -> Vec<Goal> {
        self.state.lock().unwrap().goals.clone()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: BackendCall) -> Result<std::sync::MutexGuard<'_, BackendState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing {
            return Err(Error::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl GoalBackend for InMemoryBackend {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let state = self.record(BackendCall::List)?;
        Ok(state.goals.clone())
    }

    async fn create_goal(&self, new_goal: &NewGoal) -> Result<Goal> {
        let mut state = self.record(BackendCall::Create(new_goal.clone()))?;
        let id = GoalId::new(state.next_id.to_string());
        state.next_id += 1;
        let goal = new_goal.clone().into_goal(id);
        state.goals.push(goal.clone());
        Ok(goal)
    }

    async fn patch_goal(&self, id: &GoalId, patch: &GoalPatch) -> Result<()> {
        let mut state = self.record(BackendCall::Patch(id.clone(), patch.clone()))?;
        let goal = state
            .goals
            .iter_mut()
            .find(|goal| &goal.id == id)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("no goal {id}"),
            })?;
        patch.apply_to(goal);
        Ok(())
    }

    async fn delete_goal(&self, id: &GoalId) -> Result<()> {
        let mut state = self.record(BackendCall::Delete(id.clone()))?;
        let before = state.goals.len();
        state.goals.retain(|goal| &goal.id != id);
        if state.goals.len() == before {
            return Err(Error::Api {
                status: 404,
                message: format!("no goal {id}"),
            });
        }
        Ok(())
    }
}

/// Installs a test-writer tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Noon UTC on the given day.
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Creates a goal with custom amounts and deadline.
///
/// # Defaults
/// * `name`: "Goal {id}"
/// * `category`: "savings"
/// * `created_at`: None
pub fn goal_with(id: &str, target_amount: f64, saved_amount: f64, deadline: NaiveDate) -> Goal {
    Goal {
        id: GoalId::from(id),
        name: format!("Goal {id}"),
        target_amount,
        category: "savings".to_string(),
        deadline,
        saved_amount,
        created_at: None,
    }
}

/// Creates a named test goal with sensible defaults.
///
/// # Defaults
/// * `target_amount`: 1000.0
/// * `saved_amount`: 100.0
/// * `deadline`: 2025-12-31
pub fn create_test_goal(id: &str, name: &str) -> Goal {
    Goal {
        name: name.to_string(),
        ..goal_with(id, 1000.0, 100.0, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    }
}

/// Sets up a store over an in-memory backend holding `goals`, with the cache loaded.
/// Returns (store, backend) so tests can inspect what the service received.
pub async fn setup_store(
    goals: Vec<Goal>,
    policy: MutationPolicy,
) -> (GoalStore, Arc<InMemoryBackend>) {
    init_test_tracing();
    let backend = Arc::new(InMemoryBackend::with_goals(goals));
    let shared = Arc::clone(&backend);
    let mut store = GoalStore::new(shared, policy);
    store.fetch_goals().await.expect("initial fetch");
    (store, backend)
}
