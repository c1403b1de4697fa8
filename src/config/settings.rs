//! Settings loading from planner.toml
//!
//! Every section and key is optional; a missing file yields the defaults. The
//! file location can be moved with the `GOAL_PLANNER_CONFIG` environment variable.

use crate::config::api::DEFAULT_API_URL;
use crate::errors::{Error, Result};
use crate::store::MutationPolicy;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an alternative settings file
pub const CONFIG_PATH_ENV: &str = "GOAL_PLANNER_CONFIG";

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "planner.toml";

/// Whole settings file
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Settings {
    /// Persistence service connection
    pub api: ApiSettings,
    /// Goal store behavior
    pub store: StoreSettings,
    /// Text output
    pub display: DisplaySettings,
}

/// `[api]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the REST service; goals live at `{base_url}/goals`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// `[store]` section
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StoreSettings {
    /// Whether delete/patch touch the cache before the service confirms
    pub mutation_policy: MutationPolicy,
}

/// `[display]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    /// Prefix printed before amounts
    pub currency_symbol: String,
    /// Width of the text progress bar in characters
    pub progress_bar_length: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            progress_bar_length: 10,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A key has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {path_ref:?}: {e}"),
    })?;

    parse_config(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file {path_ref:?}: {e}"),
    })
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> std::result::Result<Settings, toml::de::Error> {
    toml::from_str(contents)
}

/// Loads settings from `GOAL_PLANNER_CONFIG` or `./planner.toml`.
///
/// A missing default file is not an error: the defaults are used. A file named
/// explicitly through the environment must exist.
pub fn load_default_config() -> Result<Settings> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::debug!("No {DEFAULT_CONFIG_PATH} found, using default settings");
        Ok(Settings::default())
    }
}
