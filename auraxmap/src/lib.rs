//! auraxmap - Read-only map service for a persistent-world shooter
//!
//! This library exposes a read-only view of the game's world map: the
//! static topology (continents, capturable bases and the lattice graph
//! connecting them) overlaid with live per-server base ownership, plus
//! the deterministic tile-addressing scheme used to render the map at
//! multiple levels of detail.
//!
//! # High-Level API
//!
//! Load the topology once, spawn the ownership refresher, and serve
//! queries through [`query::QueryService`]:
//!
//! ```ignore
//! use std::sync::Arc;
//! use auraxmap::graph::WorldGraph;
//! use auraxmap::ownership::{OwnershipOverlay, OwnershipRefresher};
//! use auraxmap::query::{QueryService, TrackingConfig};
//! use auraxmap::source::JsonDirectorySource;
//!
//! let source = JsonDirectorySource::new("data");
//! let graph = Arc::new(WorldGraph::load(&source).await?);
//! let overlay = OwnershipOverlay::new();
//!
//! let refresher = OwnershipRefresher::new(
//!     source, Arc::clone(&graph), overlay.clone(), interval);
//! tokio::spawn(refresher.run());
//!
//! let service = QueryService::new(graph, overlay, TrackingConfig::default());
//! let continents = service.get_continents();
//! ```

pub mod config;
pub mod graph;
pub mod logging;
pub mod map;
pub mod ownership;
pub mod query;
pub mod source;
pub mod tile;

/// Version of the auraxmap library.
///
/// This is synchronized across all components in the workspace; the
/// value is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
