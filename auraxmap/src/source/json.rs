//! JSON snapshot directory data source.
//!
//! Reads the map datasets from a directory of JSON files:
//!
//! ```text
//! data/
//!   continents.json   [{id, name, code, description, map_size, tracked?}]
//!   servers.json      [{id, name, region, platform, tracked?}]
//!   bases.json        [{id, continent_id, name, map_pos, ...}]
//!   lattice.json      [{base_id_a, base_id_b, continent_id}]
//!   ownership.json    [{continent_id, base_id, server_id,
//!                       owning_faction_id, owned_since}]
//! ```
//!
//! Files are re-read on every call, so replacing `ownership.json` on
//! disk is picked up by the next refresh cycle without a restart. The
//! row structs in this file are the only place the on-disk field names
//! appear; renaming a backend column means touching this adapter and
//! nothing else.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::map::{
    Base, Continent, ContinentId, FactionId, LatticeLink, OwnershipRecord, Server, ServerId,
};

use super::{DataSource, SourceError};

/// Continent row as stored on disk; `tracked` is the backend's curation
/// flag and defaults to false when absent.
#[derive(Debug, Deserialize)]
struct ContinentRow {
    #[serde(flatten)]
    continent: Continent,
    #[serde(default)]
    tracked: bool,
}

#[derive(Debug, Deserialize)]
struct ServerRow {
    #[serde(flatten)]
    server: Server,
    #[serde(default)]
    tracked: bool,
}

/// Lattice row using the backend's column naming.
#[derive(Debug, Deserialize)]
struct LatticeRow {
    base_id_a: u32,
    base_id_b: u32,
    continent_id: ContinentId,
}

#[derive(Debug, Deserialize)]
struct OwnershipRow {
    continent_id: ContinentId,
    base_id: u32,
    server_id: ServerId,
    owning_faction_id: FactionId,
    owned_since: DateTime<Utc>,
}

/// Data source reading JSON snapshot files from a directory.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    /// Create a source over the given data directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this source reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, SourceError> {
        let path = self.dir.join(file);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::DatasetRead { path, source })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl DataSource for JsonDirectorySource {
    async fn list_continents(&self) -> Result<Vec<Continent>, SourceError> {
        let rows: Vec<ContinentRow> = self.read_rows("continents.json").await?;
        Ok(rows.into_iter().map(|r| r.continent).collect())
    }

    async fn list_servers(&self) -> Result<Vec<Server>, SourceError> {
        let rows: Vec<ServerRow> = self.read_rows("servers.json").await?;
        Ok(rows.into_iter().map(|r| r.server).collect())
    }

    async fn list_bases(&self, continent_id: ContinentId) -> Result<Vec<Base>, SourceError> {
        let rows: Vec<Base> = self.read_rows("bases.json").await?;
        Ok(rows
            .into_iter()
            .filter(|b| b.continent_id == continent_id)
            .collect())
    }

    async fn list_lattice(
        &self,
        continent_id: ContinentId,
    ) -> Result<Vec<LatticeLink>, SourceError> {
        let rows: Vec<LatticeRow> = self.read_rows("lattice.json").await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.continent_id == continent_id)
            .map(|r| LatticeLink::new(r.base_id_a, r.base_id_b, r.continent_id))
            .collect())
    }

    async fn list_ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Result<Vec<OwnershipRecord>, SourceError> {
        let rows: Vec<OwnershipRow> = self.read_rows("ownership.json").await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.continent_id == continent_id && r.server_id == server_id)
            .map(|r| OwnershipRecord {
                base_id: r.base_id,
                server_id: r.server_id,
                owning_faction_id: r.owning_faction_id,
                owned_since: r.owned_since,
            })
            .collect())
    }

    async fn list_tracked_continents(&self) -> Result<Vec<ContinentId>, SourceError> {
        let rows: Vec<ContinentRow> = self.read_rows("continents.json").await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.tracked)
            .map(|r| r.continent.id)
            .collect())
    }

    async fn list_tracked_servers(&self) -> Result<Vec<ServerId>, SourceError> {
        let rows: Vec<ServerRow> = self.read_rows("servers.json").await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.tracked)
            .map(|r| r.server.id)
            .collect())
    }

    fn name(&self) -> &str {
        "json-directory"
    }
}
