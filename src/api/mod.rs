//! Persistence service interface.
//!
//! The store only sees [`GoalBackend`]; the HTTP client is one implementation and the
//! tests use an in-memory one.

/// REST client for the `/goals` resource
pub mod http;

use crate::{
    entities::{Goal, GoalId, GoalPatch, NewGoal},
    errors::Result,
};
use async_trait::async_trait;

pub use http::HttpGoalBackend;

/// The four calls the goal store makes against the persistence service.
#[async_trait]
pub trait GoalBackend: Send + Sync {
    /// `GET /goals`
    async fn list_goals(&self) -> Result<Vec<Goal>>;
    /// `POST /goals`, returning the stored record with its assigned id
    async fn create_goal(&self, new_goal: &NewGoal) -> Result<Goal>;
    /// `PATCH /goals/{id}` with only the changed fields
    async fn patch_goal(&self, id: &GoalId, patch: &GoalPatch) -> Result<()>;
    /// `DELETE /goals/{id}`
    async fn delete_goal(&self, id: &GoalId) -> Result<()>;
}
