//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These
//! are pure data types; parsing lives in [`super::file`] and defaults in
//! [`super::defaults`].

use std::path::PathBuf;
use std::time::Duration;

use crate::query::TrackingFilter;

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// HTTP listener settings
    pub server: ServerSettings,
    /// Data source and asset locations
    pub data: DataSettings,
    /// Ownership refresh cadence
    pub refresh: RefreshSettings,
    /// Tracked-entity filtering
    pub tracking: TrackingSettings,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl ServerSettings {
    /// The socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which data source adapter to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// JSON snapshot files in `data_dir`
    Json,
    /// Upstream HTTP collector at `upstream_url`
    Rest,
}

/// Data source and asset locations.
#[derive(Debug, Clone)]
pub struct DataSettings {
    /// Adapter selection
    pub source: SourceKind,
    /// Directory of JSON snapshot files (json source)
    pub data_dir: PathBuf,
    /// Upstream collector base URL (rest source)
    pub upstream_url: Option<String>,
    /// Root directory of the static tile/hex assets
    pub asset_dir: PathBuf,
}

/// Ownership refresh cadence.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Seconds between refresh cycles
    pub interval_secs: u64,
}

impl RefreshSettings {
    /// The refresh interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Tracked-entity filtering configuration.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// Filter for `/continents/tracked`
    pub continents: TrackingFilter,
    /// Filter for `/servers/tracked`
    pub servers: TrackingFilter,
}
