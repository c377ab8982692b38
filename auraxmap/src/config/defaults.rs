//! Default values for all configuration settings.

use crate::query::TrackingFilter;

use super::settings::*;

/// Default listener interface.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listener port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default JSON data directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default static asset directory.
pub const DEFAULT_ASSET_DIR: &str = "public";

/// Default seconds between ownership refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Lower bound on the refresh interval; anything faster hammers the
/// upstream without the map changing meaningfully.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 5;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            data: DataSettings::default(),
            refresh: RefreshSettings::default(),
            tracking: TrackingSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: SourceKind::Json,
            data_dir: DEFAULT_DATA_DIR.into(),
            upstream_url: None,
            asset_dir: DEFAULT_ASSET_DIR.into(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            continents: TrackingFilter::SourceFlag,
            servers: TrackingFilter::SourceFlag,
        }
    }
}
