/// Persistence service endpoint resolution
pub mod api;

/// Settings loading from planner.toml
pub mod settings;

pub use settings::{ApiSettings, DisplaySettings, Settings, StoreSettings};
