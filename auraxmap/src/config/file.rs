//! Configuration file loading.
//!
//! Loads the INI configuration with sensible defaults: a missing file or
//! a missing key falls back to the default value, while a present but
//! invalid value is an error (misconfiguration should fail loudly, not
//! silently run with defaults).
//!
//! ```ini
//! [server]
//! host = 0.0.0.0
//! port = 8000
//!
//! [data]
//! source = json            ; or: rest
//! data_dir = data
//! upstream_url =           ; required for the rest source
//! asset_dir = public
//!
//! [refresh]
//! interval_secs = 30
//!
//! [tracking]
//! continents = source-flag ; or: allow-list
//! continent_names = Indar, Amerish
//! servers = source-flag
//! server_names = Cobalt, Miller
//! ```

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use crate::query::TrackingFilter;

use super::defaults::MIN_REFRESH_INTERVAL_SECS;
use super::settings::{ConfigFile, SourceKind};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// A present value could not be interpreted
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        /// Section the key lives in
        section: String,
        /// Offending key
        key: String,
        /// Value as written in the file
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_owned(),
        key: key.to_owned(),
        value: value.to_owned(),
        reason: reason.into(),
    }
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Build a configuration from parsed INI content.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("server")) {
            if let Some(host) = section.get("host") {
                config.server.host = host.to_owned();
            }
            if let Some(port) = section.get("port") {
                config.server.port = port
                    .parse()
                    .map_err(|_| invalid("server", "port", port, "expected a port number"))?;
            }
        }

        if let Some(section) = ini.section(Some("data")) {
            if let Some(source) = section.get("source") {
                config.data.source = match source {
                    "json" => SourceKind::Json,
                    "rest" => SourceKind::Rest,
                    other => {
                        return Err(invalid("data", "source", other, "expected 'json' or 'rest'"))
                    }
                };
            }
            if let Some(dir) = section.get("data_dir") {
                config.data.data_dir = dir.into();
            }
            if let Some(url) = section.get("upstream_url") {
                if !url.is_empty() {
                    config.data.upstream_url = Some(url.to_owned());
                }
            }
            if let Some(dir) = section.get("asset_dir") {
                config.data.asset_dir = dir.into();
            }
            if config.data.source == SourceKind::Rest && config.data.upstream_url.is_none() {
                return Err(invalid(
                    "data",
                    "upstream_url",
                    "",
                    "required when source = rest",
                ));
            }
        }

        if let Some(section) = ini.section(Some("refresh")) {
            if let Some(secs) = section.get("interval_secs") {
                let parsed: u64 = secs.parse().map_err(|_| {
                    invalid("refresh", "interval_secs", secs, "expected seconds")
                })?;
                if parsed < MIN_REFRESH_INTERVAL_SECS {
                    return Err(invalid(
                        "refresh",
                        "interval_secs",
                        secs,
                        format!("minimum is {} seconds", MIN_REFRESH_INTERVAL_SECS),
                    ));
                }
                config.refresh.interval_secs = parsed;
            }
        }

        if let Some(section) = ini.section(Some("tracking")) {
            config.tracking.continents = parse_filter(
                section.get("continents"),
                section.get("continent_names"),
                "continents",
            )?;
            config.tracking.servers = parse_filter(
                section.get("servers"),
                section.get("server_names"),
                "servers",
            )?;
        }

        Ok(config)
    }
}

/// Parse one tracking strategy key together with its name list.
fn parse_filter(
    strategy: Option<&str>,
    names: Option<&str>,
    key: &str,
) -> Result<TrackingFilter, ConfigError> {
    match strategy {
        None | Some("source-flag") => Ok(TrackingFilter::SourceFlag),
        Some("allow-list") => {
            let names = names.unwrap_or_default();
            let list: Vec<&str> = names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .collect();
            if list.is_empty() {
                return Err(invalid(
                    "tracking",
                    key,
                    "allow-list",
                    "allow-list strategy requires a non-empty name list",
                ));
            }
            Ok(TrackingFilter::allow_list(list))
        }
        Some(other) => Err(invalid(
            "tracking",
            key,
            other,
            "expected 'source-flag' or 'allow-list'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::{DEFAULT_PORT, DEFAULT_REFRESH_INTERVAL_SECS};
    use std::io::Write;

    fn load(contents: &str) -> Result<ConfigFile, ConfigError> {
        let ini = Ini::load_from_str(contents).expect("test INI must parse");
        ConfigFile::from_ini(&ini)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ConfigFile::load_from(Path::new("/nonexistent/auraxmap.ini")).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.refresh.interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9090").unwrap();
        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = load("").unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.data.source, SourceKind::Json);
        assert_eq!(config.tracking.continents, TrackingFilter::SourceFlag);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = load("[server]\nhost = 0.0.0.0\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = load("[server]\nport = not-a-port\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_rest_source_requires_url() {
        let err = load("[data]\nsource = rest\n").unwrap_err();
        assert!(err.to_string().contains("upstream_url"));

        let config = load("[data]\nsource = rest\nupstream_url = http://collector:9000\n").unwrap();
        assert_eq!(config.data.source, SourceKind::Rest);
        assert_eq!(
            config.data.upstream_url.as_deref(),
            Some("http://collector:9000")
        );
    }

    #[test]
    fn test_unknown_source_kind_rejected() {
        let err = load("[data]\nsource = postgres\n").unwrap_err();
        assert!(err.to_string().contains("expected 'json' or 'rest'"));
    }

    #[test]
    fn test_refresh_interval_minimum_enforced() {
        let err = load("[refresh]\ninterval_secs = 1\n").unwrap_err();
        assert!(err.to_string().contains("minimum"));
    }

    #[test]
    fn test_allow_list_tracking_parsed() {
        let config = load(
            "[tracking]\ncontinents = allow-list\ncontinent_names = Indar, Amerish\n",
        )
        .unwrap();
        assert_eq!(
            config.tracking.continents,
            TrackingFilter::allow_list(["Indar", "Amerish"])
        );
        // Servers untouched by the section stay on the default strategy
        assert_eq!(config.tracking.servers, TrackingFilter::SourceFlag);
    }

    #[test]
    fn test_allow_list_without_names_rejected() {
        let err = load("[tracking]\nservers = allow-list\n").unwrap_err();
        assert!(err.to_string().contains("non-empty name list"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = load("[tracking]\ncontinents = everything\n").unwrap_err();
        assert!(err.to_string().contains("expected 'source-flag'"));
    }
}
