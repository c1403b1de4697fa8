//! Entity module - records exchanged with the persistence service.
//! `Goal` is what the service stores; `NewGoal` and `GoalPatch` are the
//! request bodies for creating and partially updating one.

pub mod goal;

pub use goal::{Goal, GoalId, GoalPatch, NewGoal};
