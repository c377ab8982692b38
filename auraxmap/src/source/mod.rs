//! Data source abstraction
//!
//! The persistence behind the map data is an external collaborator. This
//! module defines the narrow read interface the rest of the crate
//! depends on, one method per query the backend exposes, and keeps every
//! payload-to-domain mapping inside the individual adapters so that a
//! backend schema change touches exactly one file.
//!
//! Three adapters are provided:
//!
//! - [`MemorySource`] — fixture data held in memory, for tests and
//!   embedded development datasets.
//! - [`JsonDirectorySource`] — JSON snapshot files in a data directory.
//! - [`RestSource`] — an upstream HTTP collector exposing the same
//!   payloads, fetched with reqwest.

mod json;
mod memory;
mod rest;

pub use json::JsonDirectorySource;
pub use memory::MemorySource;
pub use rest::RestSource;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::map::{Base, Continent, ContinentId, LatticeLink, OwnershipRecord, Server, ServerId};

/// Errors raised by data source adapters.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A dataset file could not be read
    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A payload did not match the expected shape
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The upstream collector could not be reached or answered with an
    /// error status
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Narrow read interface over the map data backend.
///
/// All methods return full result sets; filtering beyond the listed
/// parameters happens in the caller. Implementations must be cheap to
/// call repeatedly: the world graph is loaded once at startup, but
/// ownership is re-fetched on every refresh cycle.
pub trait DataSource: Send + Sync {
    /// List every known continent.
    fn list_continents(&self) -> impl Future<Output = Result<Vec<Continent>, SourceError>> + Send;

    /// List every known game server.
    fn list_servers(&self) -> impl Future<Output = Result<Vec<Server>, SourceError>> + Send;

    /// List the bases of one continent.
    fn list_bases(
        &self,
        continent_id: ContinentId,
    ) -> impl Future<Output = Result<Vec<Base>, SourceError>> + Send;

    /// List the lattice links of one continent.
    fn list_lattice(
        &self,
        continent_id: ContinentId,
    ) -> impl Future<Output = Result<Vec<LatticeLink>, SourceError>> + Send;

    /// List the current ownership set for one (continent, server) pair.
    fn list_ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> impl Future<Output = Result<Vec<OwnershipRecord>, SourceError>> + Send;

    /// Continents the backend flags as tracked.
    ///
    /// Backends without a tracking flag return an empty list.
    fn list_tracked_continents(
        &self,
    ) -> impl Future<Output = Result<Vec<ContinentId>, SourceError>> + Send;

    /// Servers the backend flags as tracked.
    ///
    /// Backends without a tracking flag return an empty list.
    fn list_tracked_servers(
        &self,
    ) -> impl Future<Output = Result<Vec<ServerId>, SourceError>> + Send;

    /// Returns the adapter's name for logging and identification.
    fn name(&self) -> &str;
}
