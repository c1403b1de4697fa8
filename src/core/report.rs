//! Report generation - aggregate overview and text rendering of goal metrics.
//!
//! The overview is recomputed from the cached goals on every call. Formatting helpers
//! return plain strings so any front end can print them.

use crate::{
    config::DisplaySettings,
    core::status::{compute_progress, compute_status},
    entities::Goal,
};
use chrono::{DateTime, Utc};

/// Totals across every cached goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    /// Number of goals
    pub total_goals_count: usize,
    /// Sum of all saved amounts
    pub total_saved: f64,
    /// Goals whose saved amount has reached the target
    pub completed_goals_count: usize,
}

/// Aggregates the goal list into an [`Overview`].
#[must_use]
pub fn compute_overview(goals: &[Goal]) -> Overview {
    Overview {
        total_goals_count: goals.len(),
        total_saved: goals.iter().map(|goal| goal.saved_amount).sum(),
        completed_goals_count: goals.iter().filter(|goal| goal.is_complete()).count(),
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`. The bar is clamped
/// to 0-100 but the printed percentage is not, so overshoot stays visible.
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: usize) -> String {
    let clamped_progress = if progress_percent.is_nan() {
        0.0
    } else {
        progress_percent.clamp(0.0, 100.0)
    };

    // clamped_progress is within [0, 100] so the product is within [0, bar_length].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * bar_length as f64).round() as usize;
    let empty = bar_length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats an amount with the currency symbol and two decimals, e.g. `$1250.00`.
#[must_use]
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{currency_symbol}{:.2}", amount.abs())
    } else {
        format!("{currency_symbol}{amount:.2}")
    }
}

/// Renders one goal as a multi-line card.
#[must_use]
pub fn format_goal_card(goal: &Goal, now: DateTime<Utc>, display: &DisplaySettings) -> String {
    let symbol = &display.currency_symbol;
    let status = compute_status(goal, now);
    let bar = format_progress_bar(compute_progress(goal), display.progress_bar_length);

    format!(
        "{name} (id: {id})\n  Category: {category}\n  Deadline: {deadline}\n  Saved: {saved} / {target}\n  {bar}\n  Status: {label}",
        name = goal.name,
        id = goal.id,
        category = goal.category,
        deadline = goal.deadline,
        saved = format_amount(goal.saved_amount, symbol),
        target = format_amount(goal.target_amount, symbol),
        label = status.label(),
    )
}

/// Renders the overview block.
#[must_use]
pub fn format_overview(overview: &Overview, display: &DisplaySettings) -> String {
    format!(
        "Overview\n  Total Goals: {}\n  Total Saved: {}\n  Completed Goals: {}",
        overview.total_goals_count,
        format_amount(overview.total_saved, &display.currency_symbol),
        overview.completed_goals_count,
    )
}
