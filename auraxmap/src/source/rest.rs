//! REST upstream data source.
//!
//! Fetches the map datasets from an upstream HTTP collector that exposes
//! one JSON endpoint per query, mirroring the view-per-query layout of
//! the reference backend:
//!
//! ```text
//! GET {base}/continents
//! GET {base}/continents/tracked
//! GET {base}/servers
//! GET {base}/servers/tracked
//! GET {base}/bases?continent_id={id}
//! GET {base}/lattice?continent_id={id}
//! GET {base}/ownership?continent_id={id}&server_id={id}
//! ```

use serde::de::DeserializeOwned;

use crate::map::{Base, Continent, ContinentId, LatticeLink, OwnershipRecord, Server, ServerId};

use super::{DataSource, SourceError};

/// Data source backed by an upstream HTTP collector.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: reqwest::Client,
    base_url: String,
}

impl RestSource {
    /// Create a source for the given upstream base URL.
    ///
    /// A trailing slash on the URL is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The upstream base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

impl DataSource for RestSource {
    async fn list_continents(&self) -> Result<Vec<Continent>, SourceError> {
        self.fetch("continents", &[]).await
    }

    async fn list_servers(&self) -> Result<Vec<Server>, SourceError> {
        self.fetch("servers", &[]).await
    }

    async fn list_bases(&self, continent_id: ContinentId) -> Result<Vec<Base>, SourceError> {
        self.fetch("bases", &[("continent_id", continent_id.to_string())])
            .await
    }

    async fn list_lattice(
        &self,
        continent_id: ContinentId,
    ) -> Result<Vec<LatticeLink>, SourceError> {
        let links: Vec<LatticeLink> = self
            .fetch("lattice", &[("continent_id", continent_id.to_string())])
            .await?;
        // Normalize endpoint order; the upstream makes no ordering promise
        Ok(links
            .into_iter()
            .map(|l| LatticeLink::new(l.base_a, l.base_b, l.continent_id))
            .collect())
    }

    async fn list_ownership(
        &self,
        continent_id: ContinentId,
        server_id: ServerId,
    ) -> Result<Vec<OwnershipRecord>, SourceError> {
        self.fetch(
            "ownership",
            &[
                ("continent_id", continent_id.to_string()),
                ("server_id", server_id.to_string()),
            ],
        )
        .await
    }

    async fn list_tracked_continents(&self) -> Result<Vec<ContinentId>, SourceError> {
        let continents: Vec<Continent> = self.fetch("continents/tracked", &[]).await?;
        Ok(continents.into_iter().map(|c| c.id).collect())
    }

    async fn list_tracked_servers(&self) -> Result<Vec<ServerId>, SourceError> {
        let servers: Vec<Server> = self.fetch("servers/tracked", &[]).await?;
        Ok(servers.into_iter().map(|s| s.id).collect())
    }

    fn name(&self) -> &str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let source = RestSource::new("http://collector.example/api/");
        assert_eq!(source.base_url(), "http://collector.example/api");
        assert_eq!(
            source.endpoint("continents"),
            "http://collector.example/api/continents"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let source = RestSource::new("http://collector.example");
        assert_eq!(
            source.endpoint("servers/tracked"),
            "http://collector.example/servers/tracked"
        );
    }
}
