//! Persistence service endpoint configuration.
//!
//! Resolves the base URL of the REST service that stores goals. The URL comes from
//! the `GOAL_PLANNER_API_URL` environment variable when set, otherwise from the
//! settings file, otherwise from the local development default.

use crate::config::Settings;

/// Environment variable overriding the persistence service base URL
pub const API_URL_ENV: &str = "GOAL_PLANNER_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Path of the goal collection below the base URL
pub const GOALS_RESOURCE: &str = "goals";

/// Gets the base URL from the environment, falling back to the settings file value.
#[must_use]
pub fn get_api_url(settings: &Settings) -> String {
    std::env::var(API_URL_ENV).unwrap_or_else(|_| settings.api.base_url.clone())
}

/// Builds the collection URL (`{base}/goals`) from a base URL.
///
/// A trailing slash on the base is tolerated.
#[must_use]
pub fn goals_url(base_url: &str) -> String {
    format!("{}/{GOALS_RESOURCE}", base_url.trim_end_matches('/'))
}
