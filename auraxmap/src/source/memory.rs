//! In-memory data source for fixtures and embedded datasets.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::map::{Base, Continent, ContinentId, LatticeLink, OwnershipRecord, Server, ServerId};

use super::{DataSource, SourceError};

/// Data source serving fixture data held entirely in memory.
///
/// Ownership records can be replaced after construction, which makes
/// this adapter the workhorse of refresh-cycle tests: swap the records,
/// trigger a refresh, observe the published snapshot. The optional
/// failure switch makes every call error, for exercising the
/// stale-snapshot degradation path.
///
/// # Example
///
/// ```
/// use auraxmap::source::MemorySource;
///
/// let source = MemorySource::new()
///     .with_continents(vec![/* ... */])
///     .with_servers(vec![/* ... */]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    continents: Vec<Continent>,
    servers: Vec<Server>,
    bases: Vec<Base>,
    lattice: Vec<LatticeLink>,
    ownership: Mutex<HashMap<ContinentId, Vec<OwnershipRecord>>>,
    tracked_continents: BTreeSet<ContinentId>,
    tracked_servers: BTreeSet<ServerId>,
    failing: Mutex<bool>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the continent list.
    pub fn with_continents(mut self, continents: Vec<Continent>) -> Self {
        self.continents = continents;
        self
    }

    /// Replace the server list.
    pub fn with_servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    /// Replace the base list (all continents together).
    pub fn with_bases(mut self, bases: Vec<Base>) -> Self {
        self.bases = bases;
        self
    }

    /// Replace the lattice link list (all continents together).
    pub fn with_lattice(mut self, lattice: Vec<LatticeLink>) -> Self {
        self.lattice = lattice;
        self
    }

    /// Replace the ownership record list for one continent.
    ///
    /// Records are deliberately not validated against the base list:
    /// refresh-path tests rely on feeding records for bases the topology
    /// does not know about.
    pub fn with_ownership(self, continent_id: ContinentId, ownership: Vec<OwnershipRecord>) -> Self {
        self.ownership.lock().unwrap().insert(continent_id, ownership);
        self
    }

    /// Mark the given continents as tracked by the backend.
    pub fn with_tracked_continents<I: IntoIterator<Item = ContinentId>>(mut self, ids: I) -> Self {
        self.tracked_continents = ids.into_iter().collect();
        self
    }

    /// Mark the given servers as tracked by the backend.
    pub fn with_tracked_servers<I: IntoIterator<Item = ServerId>>(mut self, ids: I) -> Self {
        self.tracked_servers = ids.into_iter().collect();
        self
    }

    /// Replace the ownership records for one continent after
    /// construction.
    pub fn set_ownership(&self, continent_id: ContinentId, ownership: Vec<OwnershipRecord>) {
        self.ownership.lock().unwrap().insert(continent_id, ownership);
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check_available(&self) -> Result<(), SourceError> {
        if *self.failing.lock().unwrap() {
            // Surfaces through the same error type a real backend outage would
            return Err(SourceError::DatasetRead {
                path: "<memory>".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "source marked failing"),
            });
        }
        Ok(())
    }
}

impl DataSource for MemorySource {
    async fn list_continents(&self) -> Result<Vec<Continent>, SourceError> {
        self.check_available()?;
        Ok(self.continents.clone())
    }

    async fn list_servers(&self) -> Result<Vec<Server>, SourceError> {
        self.check_available()?;
        Ok(self.servers.clone())
    }

    async fn list_bases(&self, continent_id: ContinentId) -> Result<Vec<Base>, SourceError> {
        self.check_available()?;
        Ok(self
            .bases
            .iter()
            .filter(|b| b.continent_id == continent_id)
            .cloned()
            .collect())
    }

    async fn list_lattice(
        &self,
        continent_id: ContinentId,
    ) -> Result<Vec<LatticeLink>, SourceError> {
        self.check_available()?;
        Ok(self
            .lattice
            .iter()
            .filter(|l| l.continent_id == continent_id)
            .copied()
            .collect())
    }

    async fn list_ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Result<Vec<OwnershipRecord>, SourceError> {
        self.check_available()?;
        Ok(self
            .ownership
            .lock()
            .unwrap()
            .get(&continent_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|o| o.server_id == server_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_tracked_continents(&self) -> Result<Vec<ContinentId>, SourceError> {
        self.check_available()?;
        Ok(self.tracked_continents.iter().copied().collect())
    }

    async fn list_tracked_servers(&self) -> Result<Vec<ServerId>, SourceError> {
        self.check_available()?;
        Ok(self.tracked_servers.iter().copied().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
