//! Query service
//!
//! The public read surface of the crate. Composes the world graph, the
//! ownership overlay and the tile catalog into the response contracts
//! consumed by the HTTP layer, and translates internal errors into the
//! single external error taxonomy.
//!
//! The service is constructed once at startup (explicit dependency
//! injection, no global state) and shared behind an `Arc`; every method
//! is a cheap in-memory lookup safe under concurrent access.

mod error;
mod tracking;

pub use error::QueryError;
pub use tracking::TrackingFilter;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::graph::WorldGraph;
use crate::map::{Base, BaseId, Continent, ContinentId, LatticeLink, OwnershipRecord, Server, ServerId};
use crate::ownership::OwnershipOverlay;
use crate::tile::{AssetPath, TileCatalog};

/// Ownership response payload for one (continent, server) pair.
///
/// `refreshed_at` is `None` until the first refresh for the pair has
/// completed; an empty `ownership` map means no base on the continent
/// has a known owner, which callers must treat as unclaimed/unknown.
#[derive(Debug, Clone, Serialize)]
pub struct OwnershipView {
    /// Continent the view covers
    pub continent_id: ContinentId,
    /// Server the view covers
    pub server_id: ServerId,
    /// Completion time of the refresh that produced this view
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Ownership records keyed by base id
    pub ownership: HashMap<BaseId, OwnershipRecord>,
}

/// Filtering configuration for the tracked-entity endpoints.
#[derive(Debug, Clone, Default)]
pub struct TrackingConfig {
    /// Filter applied to `/continents/tracked`
    pub continents: TrackingFilter,
    /// Filter applied to `/servers/tracked`
    pub servers: TrackingFilter,
}

/// Read API over the loaded topology, ownership overlay and tile
/// catalog.
pub struct QueryService {
    graph: Arc<WorldGraph>,
    overlay: OwnershipOverlay,
    catalog: TileCatalog,
    tracking: TrackingConfig,
}

impl QueryService {
    /// Create a service over a loaded topology.
    ///
    /// The tile catalog is derived from the loaded continent codes, so
    /// tile resolution and topology queries agree on which maps exist.
    pub fn new(graph: Arc<WorldGraph>, overlay: OwnershipOverlay, tracking: TrackingConfig) -> Self {
        let catalog = TileCatalog::new(graph.continents().map(|c| c.code.clone()));
        Self {
            graph,
            overlay,
            catalog,
            tracking,
        }
    }

    /// All continents, ascending id order.
    pub fn get_continents(&self) -> Vec<Continent> {
        self.graph.continents().cloned().collect()
    }

    /// Continents restricted by the configured tracking filter.
    pub fn get_tracked_continents(&self) -> Vec<Continent> {
        self.graph
            .continents()
            .filter(|c| {
                self.tracking
                    .continents
                    .keeps(&c.name, self.graph.tracked_continent_ids().contains(&c.id))
            })
            .cloned()
            .collect()
    }

    /// All servers, ascending id order.
    pub fn get_servers(&self) -> Vec<Server> {
        self.graph.servers().cloned().collect()
    }

    /// Servers restricted by the configured tracking filter.
    pub fn get_tracked_servers(&self) -> Vec<Server> {
        self.graph
            .servers()
            .filter(|s| {
                self.tracking
                    .servers
                    .keeps(&s.name, self.graph.tracked_server_ids().contains(&s.id))
            })
            .cloned()
            .collect()
    }

    /// The bases of one continent.
    pub fn get_bases(&self, continent_id: ContinentId) -> Result<Vec<Base>, QueryError> {
        Ok(self.graph.bases_by_continent(continent_id)?.to_vec())
    }

    /// The lattice links of one continent.
    pub fn get_lattice(&self, continent_id: ContinentId) -> Result<Vec<LatticeLink>, QueryError> {
        Ok(self.graph.lattice_links(continent_id)?.to_vec())
    }

    /// Current ownership for a (continent, server) pair.
    ///
    /// Both ids are validated against the topology before the overlay is
    /// consulted; a pair that has never refreshed yields an empty view,
    /// not an error.
    pub fn get_ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Result<OwnershipView, QueryError> {
        self.graph.bases_by_continent(continent_id)?;
        if self.graph.server(server_id).is_none() {
            return Err(QueryError::UnknownServer(server_id));
        }
        let snapshot = self.overlay.ownership(continent_id, server_id);
        Ok(OwnershipView {
            continent_id,
            server_id,
            refreshed_at: snapshot.as_ref().map(|s| s.refreshed_at),
            ownership: snapshot
                .map(|s| s.records.clone())
                .unwrap_or_default(),
        })
    }

    /// Resolve a tile request to its asset path.
    ///
    /// Unknown map codes and invalid coordinates both surface as
    /// [`QueryError::TileNotFound`], giving callers one consistent
    /// missing-tile error.
    pub fn resolve_tile(
        &self,
        map_code: &str,
        lod: u8,
        x: i32,
        y: i32,
    ) -> Result<AssetPath, QueryError> {
        self.catalog
            .resolve(map_code, lod, x, y)
            .map_err(|_| QueryError::TileNotFound {
                map_code: map_code.to_owned(),
                lod,
                x,
                y,
            })
    }

    /// Resolve the hex outline SVG path for a map.
    ///
    /// An unknown code is an unknown-continent error: hex outlines exist
    /// exactly for the loaded maps.
    pub fn resolve_hex(&self, map_code: &str) -> Result<AssetPath, QueryError> {
        self.catalog
            .hex_path(map_code)
            .map_err(|_| QueryError::UnknownMapCode(map_code.to_owned()))
    }
}
