//! Ownership overlay
//!
//! Tracks which faction currently controls each base, per game server,
//! on top of the immutable world topology. Ownership is externally
//! sourced and read-only from this service's perspective: a timer-driven
//! refresher fetches the full set for each (continent, server) pair and
//! publishes it as a new immutable snapshot.
//!
//! # Snapshot semantics
//!
//! Readers hold an `Arc` to the snapshot they looked up and are never
//! affected by later refreshes; the overlay replaces the shared map
//! entry in a single atomic operation, so a concurrent reader observes
//! either the complete old set or the complete new set, never a mix. A
//! failed refresh leaves the previous snapshot in place: stale but
//! consistent beats unavailable.

mod refresher;

pub use refresher::OwnershipRefresher;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::map::{BaseId, ContinentId, OwnershipRecord, ServerId};

/// One fully refreshed ownership set for a (continent, server) pair.
///
/// Bases without a record are unclaimed or unknown; callers must not
/// assume a default faction for them.
#[derive(Debug, Clone)]
pub struct OwnershipSnapshot {
    /// Continent this snapshot covers
    pub continent_id: ContinentId,
    /// Server this snapshot covers
    pub server_id: ServerId,
    /// Ownership records keyed by base id
    pub records: HashMap<BaseId, OwnershipRecord>,
    /// When the refresh that produced this snapshot completed
    pub refreshed_at: DateTime<Utc>,
}

/// Concurrent store of the latest completed ownership snapshots.
///
/// Cheap to clone; all clones share the same underlying map. Reads never
/// block on an in-flight refresh and always return the latest completed
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct OwnershipOverlay {
    snapshots: Arc<DashMap<(ContinentId, ServerId), Arc<OwnershipSnapshot>>>,
}

impl OwnershipOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest completed snapshot for a (continent, server) pair.
    ///
    /// Returns `None` if no refresh has completed for the pair yet.
    pub fn ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Option<Arc<OwnershipSnapshot>> {
        self.snapshots
            .get(&(continent_id, server_id))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Number of pairs with a completed snapshot.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Publish a snapshot, replacing the previous one for its pair.
    pub(crate) fn publish(&self, snapshot: OwnershipSnapshot) {
        self.snapshots.insert(
            (snapshot.continent_id, snapshot.server_id),
            Arc::new(snapshot),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        continent_id: ContinentId,
        server_id: ServerId,
        faction: i32,
    ) -> OwnershipSnapshot {
        let mut records = HashMap::new();
        records.insert(
            10,
            OwnershipRecord {
                base_id: 10,
                server_id,
                owning_faction_id: faction,
                owned_since: Utc::now(),
            },
        );
        OwnershipSnapshot {
            continent_id,
            server_id,
            records,
            refreshed_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_overlay_has_no_snapshot() {
        let overlay = OwnershipOverlay::new();
        assert!(overlay.ownership(2, 13).is_none());
        assert_eq!(overlay.snapshot_count(), 0);
    }

    #[test]
    fn test_publish_replaces_pair_snapshot() {
        let overlay = OwnershipOverlay::new();
        overlay.publish(snapshot(2, 13, 1));
        overlay.publish(snapshot(2, 13, 3));
        let current = overlay.ownership(2, 13).unwrap();
        assert_eq!(current.records[&10].owning_faction_id, 3);
        assert_eq!(overlay.snapshot_count(), 1);
    }

    #[test]
    fn test_pairs_are_independent() {
        let overlay = OwnershipOverlay::new();
        overlay.publish(snapshot(2, 13, 1));
        overlay.publish(snapshot(2, 17, 2));
        assert_eq!(overlay.ownership(2, 13).unwrap().records[&10].owning_faction_id, 1);
        assert_eq!(overlay.ownership(2, 17).unwrap().records[&10].owning_faction_id, 2);
        assert!(overlay.ownership(6, 13).is_none());
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_publish() {
        let overlay = OwnershipOverlay::new();
        overlay.publish(snapshot(2, 13, 1));
        let held = overlay.ownership(2, 13).unwrap();
        overlay.publish(snapshot(2, 13, 3));
        // The held Arc still sees the old, complete set
        assert_eq!(held.records[&10].owning_faction_id, 1);
        assert_eq!(
            overlay.ownership(2, 13).unwrap().records[&10].owning_faction_id,
            3
        );
    }
}
