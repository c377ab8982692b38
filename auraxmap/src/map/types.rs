//! Entity type definitions
//!
//! The static entities (continent, base, lattice link, server) are loaded
//! once at startup and treated as immutable reference data for the
//! lifetime of the process. Only [`OwnershipRecord`] changes over time,
//! and only through the overlay refresh cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a continent.
pub type ContinentId = u32;

/// Unique identifier of a base. Globally unique across continents.
pub type BaseId = u32;

/// Unique identifier of a game server.
pub type ServerId = u32;

/// Identifier of a faction.
///
/// Signed because two sentinel values exist alongside the real faction
/// ids; see [`FACTION_NONE`] and [`FACTION_UNCLAIMED`].
pub type FactionId = i32;

/// No ownership information is available for the base, generally due to
/// an upstream outage.
pub const FACTION_NONE: FactionId = 0;

/// The base is currently unclaimed or disabled, as happens during
/// reduced-availability alerts.
pub const FACTION_UNCLAIMED: FactionId = -1;

/// Static continent information.
///
/// The `code` field is the asset-path key: a lowercase slug used to
/// address tile and hex assets for this map (e.g. `"amerish"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    /// Unique ID of the continent
    pub id: ContinentId,
    /// Canonical display name
    pub name: String,
    /// Lowercase asset slug used in tile and hex paths
    pub code: String,
    /// Flavour-text description for continent selection screens
    pub description: String,
    /// Logical map edge length in metres; bounds valid map coordinates
    pub map_size: u32,
}

/// Static base information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    /// Unique ID of the base
    pub id: BaseId,
    /// Continent the base is located on
    pub continent_id: ContinentId,
    /// User-facing base name, not localised
    pub name: String,
    /// Map marker position as (x, y); origin at the map centre,
    /// +x east, +y north
    pub map_pos: (f64, f64),
    /// Display name of the base type (e.g. "Large Outpost")
    pub type_name: String,
    /// Base type slug for selecting icon assets (e.g. "large-outpost")
    pub type_code: String,
    /// Outfit resources awarded upon capture
    pub resource_capture_amount: f64,
    /// Outfit resources awarded per minute of control
    pub resource_control_amount: f64,
    /// Name of the awarded resource, if any
    pub resource_name: Option<String>,
    /// Resource slug for asset selection, if any
    pub resource_code: Option<String>,
}

/// An undirected lattice edge between two bases on the same continent.
///
/// Links are stored normalized with `base_a < base_b` so that an edge
/// has exactly one representation regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatticeLink {
    /// First endpoint (smaller base id after normalization)
    pub base_a: BaseId,
    /// Second endpoint (larger base id after normalization)
    pub base_b: BaseId,
    /// Continent both endpoints belong to
    pub continent_id: ContinentId,
}

impl LatticeLink {
    /// Create a link with normalized endpoint order.
    pub fn new(base_a: BaseId, base_b: BaseId, continent_id: ContinentId) -> Self {
        let (base_a, base_b) = if base_a <= base_b {
            (base_a, base_b)
        } else {
            (base_b, base_a)
        };
        Self {
            base_a,
            base_b,
            continent_id,
        }
    }

    /// Whether the given base is one of the link's endpoints.
    #[inline]
    pub fn touches(&self, base_id: BaseId) -> bool {
        self.base_a == base_id || self.base_b == base_id
    }
}

/// Game platform a server is available to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows PC
    Pc,
    /// PlayStation 4
    Ps4,
}

/// Static game server information.
///
/// Each server is an independent universe instance; base ownership is
/// partitioned per server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Unique ID of the server
    pub id: ServerId,
    /// Canonical server name
    pub name: String,
    /// Physical region, display purposes only
    pub region: String,
    /// Game platform the server serves
    pub platform: Platform,
}

/// Current ownership of a single base on a single server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Base this record describes
    pub base_id: BaseId,
    /// Server this record describes
    pub server_id: ServerId,
    /// Owning faction, or one of the sentinel values
    /// [`FACTION_NONE`] / [`FACTION_UNCLAIMED`]
    pub owning_faction_id: FactionId,
    /// When the current owner claimed the base
    pub owned_since: DateTime<Utc>,
}
