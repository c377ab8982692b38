//! Map domain entities.
//!
//! Plain data types describing the static world topology (continents,
//! bases, lattice links, game servers) and the per-server ownership
//! records layered on top of it. All types here are serde-serializable
//! payload data; nothing in this module performs I/O or holds references
//! into other components.

mod types;

pub use types::{
    Base, BaseId, Continent, ContinentId, FactionId, LatticeLink, OwnershipRecord, Platform,
    Server, ServerId, FACTION_NONE, FACTION_UNCLAIMED,
};
