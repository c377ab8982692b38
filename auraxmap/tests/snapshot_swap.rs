//! Integration tests for ownership snapshot publication.
//!
//! Verifies the core concurrency promise: readers issuing queries while
//! refresh cycles are forced in a tight loop only ever observe complete
//! snapshots, never a mix of two generations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use auraxmap::graph::WorldGraph;
use auraxmap::map::{Base, Continent, FactionId, OwnershipRecord, Platform, Server};
use auraxmap::ownership::{OwnershipOverlay, OwnershipRefresher};
use auraxmap::source::MemorySource;

const BASE_IDS: [u32; 4] = [10, 11, 12, 13];

fn fixture_continent() -> Continent {
    Continent {
        id: 2,
        name: "Indar".to_owned(),
        code: "indar".to_owned(),
        description: "Arid canyons and mesas.".to_owned(),
        map_size: 8192,
    }
}

fn fixture_base(id: u32) -> Base {
    Base {
        id,
        continent_id: 2,
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

fn fixture_server() -> Server {
    Server {
        id: 13,
        name: "Cobalt".to_owned(),
        region: "Europe".to_owned(),
        platform: Platform::Pc,
    }
}

/// One generation of ownership: every base owned by the same faction,
/// so any mixed-generation read is detectable.
fn generation(faction: FactionId) -> Vec<OwnershipRecord> {
    BASE_IDS
        .iter()
        .map(|&base_id| OwnershipRecord {
            base_id,
            server_id: 13,
            owning_faction_id: faction,
            owned_since: Utc::now(),
        })
        .collect()
}

fn fixture_source() -> MemorySource {
    MemorySource::new()
        .with_continents(vec![fixture_continent()])
        .with_servers(vec![fixture_server()])
        .with_bases(BASE_IDS.iter().map(|&id| fixture_base(id)).collect())
        .with_ownership(2, generation(1))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_see_whole_generations() {
    let source = fixture_source();
    let graph = Arc::new(WorldGraph::load(&source).await.unwrap());
    let overlay = OwnershipOverlay::new();
    let refresher = Arc::new(OwnershipRefresher::new(
        source,
        Arc::clone(&graph),
        overlay.clone(),
        Duration::from_secs(3600),
    ));
    refresher.refresh_pair(2, 13).await.unwrap();

    let stop = Arc::new(AtomicBool::new(false));

    // Reader tasks: every observed snapshot must be internally uniform
    let mut readers = Vec::new();
    for _ in 0..4 {
        let overlay = overlay.clone();
        let stop = Arc::clone(&stop);
        readers.push(tokio::spawn(async move {
            let mut observed = 0usize;
            while !stop.load(Ordering::Relaxed) {
                let snapshot = overlay.ownership(2, 13).expect("snapshot must exist");
                let factions: Vec<FactionId> = snapshot
                    .records
                    .values()
                    .map(|r| r.owning_faction_id)
                    .collect();
                assert_eq!(
                    snapshot.records.len(),
                    BASE_IDS.len(),
                    "snapshot must contain the full base set"
                );
                let first = factions[0];
                assert!(
                    factions.iter().all(|&f| f == first),
                    "observed a mixed-generation snapshot: {:?}",
                    factions
                );
                observed += 1;
                tokio::task::yield_now().await;
            }
            observed
        }));
    }

    // Writer task: force refresh cycles through alternating generations
    let writer = {
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move {
            for cycle in 0..200 {
                let faction = (cycle % 3) + 1;
                refresher.source().set_ownership(2, generation(faction));
                refresher.refresh_pair(2, 13).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        let observed = reader.await.unwrap();
        assert!(observed > 0, "reader must have observed snapshots");
    }
}

#[tokio::test]
async fn failed_refresh_serves_stale_snapshot() {
    let source = fixture_source();
    let graph = Arc::new(WorldGraph::load(&source).await.unwrap());
    let overlay = OwnershipOverlay::new();
    let refresher = OwnershipRefresher::new(
        source,
        Arc::clone(&graph),
        overlay.clone(),
        Duration::from_secs(3600),
    );

    refresher.refresh_pair(2, 13).await.unwrap();
    let good = overlay.ownership(2, 13).unwrap();

    refresher.source().set_failing(true);
    assert_eq!(refresher.refresh_all().await, 0);

    let after = overlay.ownership(2, 13).unwrap();
    assert!(
        Arc::ptr_eq(&good, &after),
        "failed refresh must leave the previous snapshot in place"
    );
    assert_eq!(after.records.len(), BASE_IDS.len());
}
