//! Core logic - framework-agnostic goal arithmetic and draft handling.
//!
//! Nothing in here talks to the network; the store feeds these functions the
//! cached goals and the current time.

/// New-goal and deposit drafts with their parse-and-validate step
pub mod draft;
/// Overview aggregation and text formatting of goal metrics
pub mod report;
/// Per-goal status and progress
pub mod status;
