//! External error taxonomy.

use thiserror::Error;

use crate::graph::UnknownContinent;
use crate::map::{ContinentId, ServerId};

/// Errors surfaced to API consumers.
///
/// Every variant carries a stable machine-readable kind string (see
/// [`kind`](Self::kind)) alongside the human-readable message, so
/// clients can branch without parsing prose.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The continent id is not part of the loaded topology
    #[error("unknown continent: {0}")]
    UnknownContinent(ContinentId),

    /// The map code does not identify a loaded continent
    #[error("unknown map code: '{0}'")]
    UnknownMapCode(String),

    /// The server id is not part of the loaded topology
    #[error("unknown server: {0}")]
    UnknownServer(ServerId),

    /// No tile exists for the requested map, LOD and coordinates
    #[error("no tile '{map_code}' lod{lod} at ({x}, {y})")]
    TileNotFound {
        /// Requested map code
        map_code: String,
        /// Requested level of detail
        lod: u8,
        /// Requested horizontal index
        x: i32,
        /// Requested vertical index
        y: i32,
    },

    /// The upstream ownership source is unavailable.
    ///
    /// Read paths never return this: they serve the last good snapshot
    /// instead. It exists for operations that explicitly demand fresh
    /// data, such as an on-demand refresh trigger.
    #[error("upstream data source unavailable")]
    UpstreamUnavailable,
}

impl QueryError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::UnknownContinent(_) | QueryError::UnknownMapCode(_) => "unknown_continent",
            QueryError::UnknownServer(_) => "unknown_server",
            QueryError::TileNotFound { .. } => "tile_not_found",
            QueryError::UpstreamUnavailable => "upstream_unavailable",
        }
    }

    /// Whether the error describes something the client asked for that
    /// does not exist, as opposed to a service-side fault.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, QueryError::UpstreamUnavailable)
    }
}

impl From<UnknownContinent> for QueryError {
    fn from(err: UnknownContinent) -> Self {
        QueryError::UnknownContinent(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_are_stable() {
        assert_eq!(QueryError::UnknownContinent(2).kind(), "unknown_continent");
        assert_eq!(
            QueryError::UnknownMapCode("oshur".to_owned()).kind(),
            "unknown_continent"
        );
        assert_eq!(QueryError::UnknownServer(13).kind(), "unknown_server");
        assert_eq!(
            QueryError::TileNotFound {
                map_code: "indar".to_owned(),
                lod: 0,
                x: 9,
                y: 0
            }
            .kind(),
            "tile_not_found"
        );
        assert_eq!(
            QueryError::UpstreamUnavailable.kind(),
            "upstream_unavailable"
        );
    }

    #[test]
    fn test_from_unknown_continent() {
        let err: QueryError = UnknownContinent(6).into();
        assert_eq!(err, QueryError::UnknownContinent(6));
    }

    #[test]
    fn test_display_contains_request_detail() {
        let err = QueryError::TileNotFound {
            map_code: "esamir".to_owned(),
            lod: 1,
            x: 2,
            y: -2,
        };
        let message = err.to_string();
        assert!(message.contains("esamir"));
        assert!(message.contains("lod1"));
    }
}
