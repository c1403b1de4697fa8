//! Unified error types for the goal planner.

use thiserror::Error;

/// Every failure the planner can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file or environment could not be turned into a configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The persistence service could not be reached or the body was unreadable
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The persistence service answered with a non-success status
    #[error("Persistence service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Text typed as an amount is not a finite number
    #[error("Invalid amount: '{input}' is not a number")]
    InvalidAmount {
        /// The rejected input
        input: String,
    },

    /// Text typed as a deadline is not a `YYYY-MM-DD` date
    #[error("Invalid date: '{input}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The rejected input
        input: String,
    },

    /// No cached goal matches the given identifier or name
    #[error("Goal '{id}' not found")]
    GoalNotFound {
        /// Identifier or name that was looked up
        id: String,
    },

    /// Command line could not be understood
    #[error("{message}")]
    Usage {
        /// Usage hint for the user
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
