//! Configuration for the map service.
//!
//! Settings are grouped per concern into one struct per `[section]` of
//! the INI file; every key has a default so an empty or missing file
//! yields a runnable development configuration.

mod defaults;
mod file;
mod settings;

pub use defaults::{
    DEFAULT_ASSET_DIR, DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_REFRESH_INTERVAL_SECS, MIN_REFRESH_INTERVAL_SECS,
};
pub use file::ConfigError;
pub use settings::{
    ConfigFile, DataSettings, RefreshSettings, ServerSettings, SourceKind, TrackingSettings,
};
