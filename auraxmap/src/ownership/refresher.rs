//! Timer-driven ownership refresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::graph::WorldGraph;
use crate::map::{ContinentId, ServerId};
use crate::source::{DataSource, SourceError};

use super::{OwnershipOverlay, OwnershipSnapshot};

/// Fetches ownership from the data source and publishes snapshots into
/// an [`OwnershipOverlay`].
///
/// The refresher runs independently of request handling: spawn
/// [`run`](Self::run) on its own task and hand clones of the overlay to
/// the readers. Each cycle walks every refreshable (continent, server)
/// pair; a pair whose fetch fails keeps its previous snapshot and is
/// retried on the next cycle.
pub struct OwnershipRefresher<D> {
    source: D,
    graph: Arc<WorldGraph>,
    overlay: OwnershipOverlay,
    interval: Duration,
}

impl<D: DataSource> OwnershipRefresher<D> {
    /// Create a refresher over the given source and topology.
    pub fn new(
        source: D,
        graph: Arc<WorldGraph>,
        overlay: OwnershipOverlay,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            graph,
            overlay,
            interval,
        }
    }

    /// The data source this refresher fetches from.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// The (continent, server) pairs a refresh cycle covers.
    ///
    /// Pairs are built from the source-flagged tracked sets where
    /// present; a backend without tracking flags gets the full cross
    /// product of loaded continents and servers.
    pub fn pairs(&self) -> Vec<(ContinentId, ServerId)> {
        let continents: Vec<ContinentId> = if self.graph.tracked_continent_ids().is_empty() {
            self.graph.continents().map(|c| c.id).collect()
        } else {
            self.graph.tracked_continent_ids().iter().copied().collect()
        };
        let servers: Vec<ServerId> = if self.graph.tracked_server_ids().is_empty() {
            self.graph.servers().map(|s| s.id).collect()
        } else {
            self.graph.tracked_server_ids().iter().copied().collect()
        };
        continents
            .iter()
            .flat_map(|&c| servers.iter().map(move |&s| (c, s)))
            .collect()
    }

    /// Refresh a single (continent, server) pair.
    ///
    /// Fetches the full ownership set, drops records whose base is not
    /// part of the continent's loaded topology (logged, not fatal), and
    /// publishes the result as a new snapshot. On error the previous
    /// snapshot for the pair remains in effect.
    pub async fn refresh_pair(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Result<(), SourceError> {
        let fetched = self.source.list_ownership(continent_id, server_id).await?;
        let total = fetched.len();

        let mut records = HashMap::with_capacity(total);
        for record in fetched {
            if self.graph.continent_of_base(record.base_id) != Some(continent_id) {
                warn!(
                    base_id = record.base_id,
                    continent_id,
                    server_id,
                    "discarding ownership record for unknown base"
                );
                continue;
            }
            records.insert(record.base_id, record);
        }

        debug!(
            continent_id,
            server_id,
            kept = records.len(),
            discarded = total - records.len(),
            "refreshed ownership pair"
        );

        self.overlay.publish(OwnershipSnapshot {
            continent_id,
            server_id,
            records,
            refreshed_at: Utc::now(),
        });
        Ok(())
    }

    /// Refresh every refreshable pair once.
    ///
    /// Returns the number of pairs that refreshed successfully. Failures
    /// are logged and leave the affected pair on its previous snapshot.
    pub async fn refresh_all(&self) -> usize {
        let mut refreshed = 0;
        for (continent_id, server_id) in self.pairs() {
            match self.refresh_pair(continent_id, server_id).await {
                Ok(()) => refreshed += 1,
                Err(err) => {
                    warn!(
                        continent_id,
                        server_id,
                        source = self.source.name(),
                        error = %err,
                        "ownership refresh failed, serving previous snapshot"
                    );
                }
            }
        }
        refreshed
    }

    /// Run the refresh loop forever.
    ///
    /// Performs one cycle per interval tick. Intended to be spawned on
    /// its own tokio task; it never blocks request handlers.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            source = self.source.name(),
            pairs = self.pairs().len(),
            "starting ownership refresh loop"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let refreshed = self.refresh_all().await;
            debug!(refreshed, "ownership refresh cycle complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Base, Continent, OwnershipRecord, Platform, Server};
    use crate::source::MemorySource;

    fn continent(id: ContinentId, code: &str) -> Continent {
        Continent {
            id,
            name: code.to_owned(),
            code: code.to_owned(),
            description: String::new(),
            map_size: 8192,
        }
    }

    fn base(id: u32, continent_id: ContinentId) -> Base {
        Base {
            id,
            continent_id,
            name: format!("Base {}", id),
            map_pos: (0.0, 0.0),
            type_name: "Small Outpost".to_owned(),
            type_code: "small-outpost".to_owned(),
            resource_capture_amount: 2.0,
            resource_control_amount: 0.4,
            resource_name: None,
            resource_code: None,
        }
    }

    fn record(base_id: u32, server_id: ServerId, faction: i32) -> OwnershipRecord {
        OwnershipRecord {
            base_id,
            server_id,
            owning_faction_id: faction,
            owned_since: Utc::now(),
        }
    }

    fn fixture_source() -> MemorySource {
        MemorySource::new()
            .with_continents(vec![continent(2, "indar")])
            .with_servers(vec![Server {
                id: 13,
                name: "Cobalt".to_owned(),
                region: "Europe".to_owned(),
                platform: Platform::Pc,
            }])
            .with_bases(vec![base(10, 2), base(11, 2)])
    }

    async fn refresher_for(source: MemorySource) -> OwnershipRefresher<MemorySource> {
        let graph = Arc::new(WorldGraph::load(&source).await.unwrap());
        OwnershipRefresher::new(
            source,
            graph,
            OwnershipOverlay::new(),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_refresh_publishes_snapshot() {
        let source = fixture_source().with_ownership(2, vec![record(10, 13, 2), record(11, 13, 3)]);
        let refresher = refresher_for(source).await;

        refresher.refresh_pair(2, 13).await.unwrap();
        let snapshot = refresher.overlay.ownership(2, 13).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[&10].owning_faction_id, 2);
    }

    #[tokio::test]
    async fn test_unclaimed_bases_absent_from_snapshot() {
        let source = fixture_source().with_ownership(2, vec![record(10, 13, 2)]);
        let refresher = refresher_for(source).await;

        refresher.refresh_pair(2, 13).await.unwrap();
        let snapshot = refresher.overlay.ownership(2, 13).unwrap();
        assert!(snapshot.records.contains_key(&10));
        assert!(
            !snapshot.records.contains_key(&11),
            "base without a record must simply be absent"
        );
    }

    #[tokio::test]
    async fn test_unknown_base_records_discarded() {
        // Base 99 is not part of the topology; base 20 exists nowhere
        // near continent 2 either
        let source = fixture_source()
            .with_ownership(2, vec![record(10, 13, 2), record(99, 13, 1), record(20, 13, 3)]);
        let refresher = refresher_for(source).await;

        refresher.refresh_pair(2, 13).await.unwrap();
        let snapshot = refresher.overlay.ownership(2, 13).unwrap();
        assert_eq!(snapshot.records.len(), 1);
        assert!(snapshot.records.contains_key(&10));
        assert!(!snapshot.records.contains_key(&99));
        assert!(!snapshot.records.contains_key(&20));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = fixture_source().with_ownership(2, vec![record(10, 13, 2)]);
        let refresher = refresher_for(source).await;

        refresher.refresh_pair(2, 13).await.unwrap();
        let before = refresher.overlay.ownership(2, 13).unwrap();

        refresher.source.set_failing(true);
        assert!(refresher.refresh_pair(2, 13).await.is_err());

        let after = refresher.overlay.ownership(2, 13).unwrap();
        assert!(Arc::ptr_eq(&before, &after), "snapshot must be untouched");
        assert_eq!(after.records[&10].owning_faction_id, 2);
    }

    #[tokio::test]
    async fn test_refresh_all_counts_failures() {
        let source = fixture_source().with_ownership(2, vec![record(10, 13, 2)]);
        let refresher = refresher_for(source).await;

        assert_eq!(refresher.refresh_all().await, 1);
        refresher.source.set_failing(true);
        assert_eq!(refresher.refresh_all().await, 0);
    }

    #[tokio::test]
    async fn test_staleness_timestamp_advances() {
        let source = fixture_source().with_ownership(2, vec![record(10, 13, 2)]);
        let refresher = refresher_for(source).await;

        refresher.refresh_pair(2, 13).await.unwrap();
        let first = refresher.overlay.ownership(2, 13).unwrap().refreshed_at;
        refresher.refresh_pair(2, 13).await.unwrap();
        let second = refresher.overlay.ownership(2, 13).unwrap().refreshed_at;
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_pairs_use_tracked_sets_when_present() {
        let source = fixture_source()
            .with_servers(vec![
                Server {
                    id: 13,
                    name: "Cobalt".to_owned(),
                    region: "Europe".to_owned(),
                    platform: Platform::Pc,
                },
                Server {
                    id: 40,
                    name: "Genudine".to_owned(),
                    region: "US East".to_owned(),
                    platform: Platform::Ps4,
                },
            ])
            .with_tracked_servers([13]);
        let refresher = refresher_for(source).await;
        assert_eq!(refresher.pairs(), vec![(2, 13)]);
    }

    #[tokio::test]
    async fn test_pairs_fall_back_to_full_cross_product() {
        let refresher = refresher_for(fixture_source()).await;
        assert_eq!(refresher.pairs(), vec![(2, 13)]);
    }
}
