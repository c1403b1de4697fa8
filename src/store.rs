//! Goal store - the in-memory goal cache kept in step with the persistence service.
//!
//! The store owns the cached goal list and the two drafts. Every mutation goes through
//! the [`GoalBackend`] first and then reconciles the cache; every derived value
//! (status, progress, overview) is computed from the cache when asked for. Changes are
//! broadcast as [`StoreEvent`]s to whoever called [`GoalStore::subscribe`].

use crate::{
    api::GoalBackend,
    core::{
        draft::{DepositDraft, NewGoalDraft},
        report::{Overview, compute_overview},
        status::{GoalStatus, compute_progress, compute_status},
    },
    entities::{Goal, GoalId, GoalPatch},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Capacity of the change notification channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// When delete and patch touch the local cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationPolicy {
    /// Only after the persistence service confirms the change
    #[default]
    Confirmed,
    /// As soon as the call resolves, whatever its outcome
    Optimistic,
}

/// Store operation, as named in failure notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Loading the goal list
    Fetch,
    /// Submitting the new-goal draft
    Create,
    /// Patching goal fields
    Update,
    /// Applying the deposit draft
    Deposit,
    /// Removing a goal
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Deposit => "deposit",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Change notification sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The cache was replaced by a fresh list
    GoalsLoaded {
        /// Number of goals now cached
        count: usize,
    },
    /// The service accepted a new goal
    GoalCreated {
        /// Identifier it assigned
        id: GoalId,
    },
    /// A cached goal was patched
    GoalUpdated {
        /// Patched goal
        id: GoalId,
    },
    /// A goal left the cache
    GoalDeleted {
        /// Removed goal
        id: GoalId,
    },
    /// One of the drafts changed
    DraftChanged,
    /// An operation failed; the message is the error text
    OperationFailed {
        /// What was being attempted
        operation: Operation,
        /// Error description
        message: String,
    },
}

/// Why an action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A new-goal field is empty
    IncompleteDraft,
    /// The deposit names no cached goal
    UnknownGoal,
    /// The deposit amount is empty
    MissingAmount,
}

/// Result of a store action that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change reached the service and the cache
    Applied,
    /// A presence check failed; nothing was sent and nothing changed
    Skipped(SkipReason),
}

/// Goal store & metrics engine
pub struct GoalStore {
    backend: Arc<dyn GoalBackend>,
    policy: MutationPolicy,
    goals: Vec<Goal>,
    new_goal: NewGoalDraft,
    deposit: DepositDraft,
    events: broadcast::Sender<StoreEvent>,
}

impl GoalStore {
    /// Creates an empty store; call [`GoalStore::fetch_goals`] to load the cache.
    #[must_use]
    pub fn new(backend: Arc<dyn GoalBackend>, policy: MutationPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            policy,
            goals: Vec::new(),
            new_goal: NewGoalDraft::default(),
            deposit: DepositDraft::default(),
            events,
        }
    }

    /// Registers a subscriber for change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn fail(&self, operation: Operation, err: Error) -> Error {
        error!("Goal {operation} failed: {err}");
        self.emit(StoreEvent::OperationFailed {
            operation,
            message: err.to_string(),
        });
        err
    }

    // --- Reads ---

    /// Cached goals in service order.
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Cached goal by identifier.
    #[must_use]
    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| &goal.id == id)
    }

    /// First cached goal whose name matches, ignoring case.
    #[must_use]
    pub fn find_goal_by_name(&self, name: &str) -> Option<&Goal> {
        let wanted = name.to_lowercase();
        self.goals
            .iter()
            .find(|goal| goal.name.to_lowercase() == wanted)
    }

    /// Cached goal by identifier, falling back to a name lookup.
    pub fn resolve_goal(&self, id_or_name: &str) -> Result<&Goal> {
        self.goal(&GoalId::from(id_or_name))
            .or_else(|| self.find_goal_by_name(id_or_name))
            .ok_or_else(|| Error::GoalNotFound {
                id: id_or_name.to_string(),
            })
    }

    /// Status of a cached goal at `now`.
    #[must_use]
    pub fn status_of(&self, id: &GoalId, now: DateTime<Utc>) -> Option<GoalStatus> {
        self.goal(id).map(|goal| compute_status(goal, now))
    }

    /// Progress percentage of a cached goal.
    #[must_use]
    pub fn progress_of(&self, id: &GoalId) -> Option<f64> {
        self.goal(id).map(compute_progress)
    }

    /// Totals across the cache.
    #[must_use]
    pub fn overview(&self) -> Overview {
        compute_overview(&self.goals)
    }

    // --- Drafts ---

    /// Pending new-goal form.
    #[must_use]
    pub const fn new_goal_draft(&self) -> &NewGoalDraft {
        &self.new_goal
    }

    /// Replaces the new-goal form.
    pub fn set_new_goal_draft(&mut self, draft: NewGoalDraft) {
        self.new_goal = draft;
        self.emit(StoreEvent::DraftChanged);
    }

    /// Pending deposit form.
    #[must_use]
    pub const fn deposit_draft(&self) -> &DepositDraft {
        &self.deposit
    }

    /// Replaces the deposit form.
    pub fn set_deposit_draft(&mut self, draft: DepositDraft) {
        self.deposit = draft;
        self.emit(StoreEvent::DraftChanged);
    }

    // --- Remote operations ---

    /// Replaces the cache with the service's full list.
    ///
    /// On failure the previous cache is kept and the error is returned.
    pub async fn fetch_goals(&mut self) -> Result<()> {
        let result = self.backend.list_goals().await;
        match result {
            Ok(goals) => {
                debug!("Goal cache replaced with {} goals", goals.len());
                self.goals = goals;
                self.emit(StoreEvent::GoalsLoaded {
                    count: self.goals.len(),
                });
                Ok(())
            }
            Err(e) => Err(self.fail(Operation::Fetch, e)),
        }
    }

    /// Submits the new-goal draft, stamped with the current time.
    pub async fn create_goal(&mut self) -> Result<Outcome> {
        self.create_goal_at(Utc::now()).await
    }

    /// Submits the new-goal draft with `createdAt = now`.
    ///
    /// An incomplete draft is skipped. After the service accepts the goal the draft is
    /// cleared and the whole list is fetched again; the cache is never patched locally.
    pub async fn create_goal_at(&mut self, now: DateTime<Utc>) -> Result<Outcome> {
        if !self.new_goal.is_complete() {
            warn!("New goal draft is incomplete, not submitting");
            return Ok(Outcome::Skipped(SkipReason::IncompleteDraft));
        }

        let new_goal = self
            .new_goal
            .parse(now)
            .map_err(|e| self.fail(Operation::Create, e))?;

        let result = self.backend.create_goal(&new_goal).await;
        let created = match result {
            Ok(goal) => goal,
            Err(e) => return Err(self.fail(Operation::Create, e)),
        };

        info!("Goal '{}' created with id {}", created.name, created.id);
        self.new_goal.clear();
        self.emit(StoreEvent::GoalCreated { id: created.id });
        self.emit(StoreEvent::DraftChanged);

        self.fetch_goals().await?;
        Ok(Outcome::Applied)
    }

    /// Sends a partial update and merges the same fields into the cached goal.
    ///
    /// Under [`MutationPolicy::Confirmed`] the cache is only touched when the service
    /// accepted the patch; under [`MutationPolicy::Optimistic`] it is merged either way
    /// and a failure is still returned.
    pub async fn update_goal(&mut self, id: &GoalId, patch: GoalPatch) -> Result<Outcome> {
        let result = self.backend.patch_goal(id, &patch).await;

        if result.is_ok() || self.policy == MutationPolicy::Optimistic {
            self.merge_patch(id, &patch);
        }

        match result {
            Ok(()) => Ok(Outcome::Applied),
            Err(e) => Err(self.fail(Operation::Update, e)),
        }
    }

    fn merge_patch(&mut self, id: &GoalId, patch: &GoalPatch) {
        if let Some(goal) = self.goals.iter_mut().find(|goal| &goal.id == id) {
            patch.apply_to(goal);
            debug!("Merged patch into cached goal {id}: {:?}", patch);
            self.emit(StoreEvent::GoalUpdated { id: id.clone() });
        } else {
            debug!("Goal {id} not cached, nothing to merge");
        }
    }

    /// Adds the deposit draft's amount to the selected goal.
    ///
    /// Skipped when the draft names no cached goal or has an empty amount. A
    /// non-numeric amount is rejected before anything is sent. The draft is cleared
    /// whenever the new amount reached the cache: on success, and under
    /// [`MutationPolicy::Optimistic`] also when the service rejected the patch.
    pub async fn apply_deposit(&mut self) -> Result<Outcome> {
        let Some(goal) = self.deposit.goal_id().and_then(|id| self.goal(&id)) else {
            warn!("Deposit names no known goal: '{}'", self.deposit.goal_id);
            return Ok(Outcome::Skipped(SkipReason::UnknownGoal));
        };
        if !self.deposit.has_amount() {
            warn!("Deposit amount is empty");
            return Ok(Outcome::Skipped(SkipReason::MissingAmount));
        }

        let id = goal.id.clone();
        let saved_amount = goal.saved_amount;
        let amount = self
            .deposit
            .parse_amount()
            .map_err(|e| self.fail(Operation::Deposit, e))?;

        let new_saved = saved_amount + amount;
        info!("Depositing {amount} into goal {id}: {saved_amount} -> {new_saved}");

        let result = self
            .update_goal(&id, GoalPatch::saved_amount(new_saved))
            .await;

        // A draft left behind after the merge would be deposited twice.
        if result.is_ok() || self.policy == MutationPolicy::Optimistic {
            self.deposit.clear();
            self.emit(StoreEvent::DraftChanged);
        }
        result
    }

    /// Removes a goal from the service and from the cache.
    ///
    /// Exactly one cached entry with a matching identifier is removed. Under
    /// [`MutationPolicy::Confirmed`] that only happens once the service confirmed the
    /// deletion; under [`MutationPolicy::Optimistic`] it happens regardless.
    pub async fn delete_goal(&mut self, id: &GoalId) -> Result<Outcome> {
        let result = self.backend.delete_goal(id).await;

        if result.is_ok() || self.policy == MutationPolicy::Optimistic {
            if let Some(index) = self.goals.iter().position(|goal| &goal.id == id) {
                self.goals.remove(index);
                debug!("Removed goal {id} from cache");
                self.emit(StoreEvent::GoalDeleted { id: id.clone() });
            }
        }

        match result {
            Ok(()) => Ok(Outcome::Applied),
            Err(e) => Err(self.fail(Operation::Delete, e)),
        }
    }
}
