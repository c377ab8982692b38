//! World topology graph
//!
//! Immutable in-memory snapshot of the static map topology: continents,
//! their bases, and the lattice links connecting those bases, plus the
//! game server list. Loaded once at startup from a [`DataSource`] and
//! shared behind an `Arc` for the lifetime of the process.
//!
//! # Integrity
//!
//! Loading validates the topology and refuses to produce a graph from
//! corrupt input. A lattice link referencing an unknown base, or a base
//! in a different continent than the link declares, silently breaks
//! pathfinding and rendering for every downstream consumer, so any such
//! violation aborts the load with a [`TopologyError`] rather than being
//! repaired or skipped. Once a graph exists, every link returned by
//! [`WorldGraph::lattice_links`] is guaranteed to have both endpoints
//! present in [`WorldGraph::bases_by_continent`] for the same continent.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;
use tracing::{debug, info};

use crate::map::{Base, BaseId, Continent, ContinentId, LatticeLink, Server, ServerId};
use crate::source::{DataSource, SourceError};

/// A continent id that is not part of the loaded topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown continent: {0}")]
pub struct UnknownContinent(pub ContinentId);

/// Topology violations detected while loading the graph.
///
/// All of these are fatal: the process must refuse to serve rather than
/// expose a corrupt graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Two continents share an id
    #[error("duplicate continent id {0}")]
    DuplicateContinent(ContinentId),

    /// Two servers share an id
    #[error("duplicate server id {0}")]
    DuplicateServer(ServerId),

    /// Two bases share an id (base ids are globally unique)
    #[error("duplicate base id {0}")]
    DuplicateBase(BaseId),

    /// A base declares a continent other than the one it was listed under
    #[error("base {base} declares continent {declared} but was loaded for continent {loaded}")]
    BaseContinentMismatch {
        /// Offending base
        base: BaseId,
        /// Continent id carried by the base record
        declared: ContinentId,
        /// Continent the record was returned for
        loaded: ContinentId,
    },

    /// A lattice link references a base that does not exist on its continent
    #[error("lattice link ({base_a}, {base_b}) on continent {continent} references unknown base {missing}")]
    UnknownLinkEndpoint {
        /// First endpoint
        base_a: BaseId,
        /// Second endpoint
        base_b: BaseId,
        /// Continent the link was returned for
        continent: ContinentId,
        /// The endpoint that is not a base of that continent
        missing: BaseId,
    },

    /// A lattice link connects a base to itself
    #[error("lattice link on continent {continent} connects base {base} to itself")]
    SelfLink {
        /// The repeated endpoint
        base: BaseId,
        /// Continent the link was returned for
        continent: ContinentId,
    },

    /// A lattice link declares a continent other than the one it was
    /// listed under
    #[error("lattice link ({base_a}, {base_b}) declares continent {declared} but was loaded for continent {loaded}")]
    LinkContinentMismatch {
        /// First endpoint
        base_a: BaseId,
        /// Second endpoint
        base_b: BaseId,
        /// Continent id carried by the link record
        declared: ContinentId,
        /// Continent the record was returned for
        loaded: ContinentId,
    },
}

/// Errors raised while building a [`WorldGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// The data source failed before the topology could be read
    #[error("topology load failed: {0}")]
    Source(#[from] SourceError),

    /// The topology itself is corrupt
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Immutable snapshot of the static world topology.
///
/// All query methods are cheap in-memory lookups and safe under
/// concurrent access; the graph never mutates after a successful load.
/// Continents and servers are kept in ascending-id order, which is the
/// documented iteration order of [`continents`](Self::continents) and
/// [`servers`](Self::servers).
#[derive(Debug)]
pub struct WorldGraph {
    continents: BTreeMap<ContinentId, Continent>,
    continents_by_code: HashMap<String, ContinentId>,
    servers: BTreeMap<ServerId, Server>,
    bases: BTreeMap<ContinentId, Vec<Base>>,
    base_continent: HashMap<BaseId, ContinentId>,
    lattice: BTreeMap<ContinentId, Vec<LatticeLink>>,
    tracked_continents: BTreeSet<ContinentId>,
    tracked_servers: BTreeSet<ServerId>,
}

impl WorldGraph {
    /// Load and validate the full topology from a data source.
    ///
    /// # Errors
    ///
    /// [`GraphError::Source`] if the source fails, [`GraphError::Topology`]
    /// if the returned data violates any topology invariant. In both
    /// cases no graph is produced.
    pub async fn load<D: DataSource>(source: &D) -> Result<Self, GraphError> {
        info!(source = source.name(), "loading world topology");

        let mut continents = BTreeMap::new();
        let mut continents_by_code = HashMap::new();
        for continent in source.list_continents().await? {
            continents_by_code.insert(continent.code.clone(), continent.id);
            if continents.insert(continent.id, continent.clone()).is_some() {
                return Err(TopologyError::DuplicateContinent(continent.id).into());
            }
        }

        let mut servers = BTreeMap::new();
        for server in source.list_servers().await? {
            if servers.insert(server.id, server.clone()).is_some() {
                return Err(TopologyError::DuplicateServer(server.id).into());
            }
        }

        let mut bases: BTreeMap<ContinentId, Vec<Base>> = BTreeMap::new();
        let mut base_continent: HashMap<BaseId, ContinentId> = HashMap::new();
        for &continent_id in continents.keys() {
            let mut continent_bases = source.list_bases(continent_id).await?;
            continent_bases.sort_by_key(|b| b.id);
            for base in &continent_bases {
                if base.continent_id != continent_id {
                    return Err(TopologyError::BaseContinentMismatch {
                        base: base.id,
                        declared: base.continent_id,
                        loaded: continent_id,
                    }
                    .into());
                }
                if base_continent.insert(base.id, continent_id).is_some() {
                    return Err(TopologyError::DuplicateBase(base.id).into());
                }
            }
            debug!(
                continent_id,
                bases = continent_bases.len(),
                "loaded continent bases"
            );
            bases.insert(continent_id, continent_bases);
        }

        let mut lattice: BTreeMap<ContinentId, Vec<LatticeLink>> = BTreeMap::new();
        for &continent_id in continents.keys() {
            let mut links = BTreeSet::new();
            for raw in source.list_lattice(continent_id).await? {
                let link = LatticeLink::new(raw.base_a, raw.base_b, raw.continent_id);
                Self::validate_link(&link, continent_id, &base_continent)?;
                links.insert((link.base_a, link.base_b));
            }
            let links: Vec<LatticeLink> = links
                .into_iter()
                .map(|(base_a, base_b)| LatticeLink {
                    base_a,
                    base_b,
                    continent_id,
                })
                .collect();
            debug!(
                continent_id,
                links = links.len(),
                "loaded continent lattice"
            );
            lattice.insert(continent_id, links);
        }

        let tracked_continents: BTreeSet<ContinentId> = source
            .list_tracked_continents()
            .await?
            .into_iter()
            .filter(|id| continents.contains_key(id))
            .collect();
        let tracked_servers: BTreeSet<ServerId> = source
            .list_tracked_servers()
            .await?
            .into_iter()
            .filter(|id| servers.contains_key(id))
            .collect();

        info!(
            continents = continents.len(),
            servers = servers.len(),
            bases = base_continent.len(),
            "world topology loaded"
        );

        Ok(Self {
            continents,
            continents_by_code,
            servers,
            bases,
            base_continent,
            lattice,
            tracked_continents,
            tracked_servers,
        })
    }

    fn validate_link(
        link: &LatticeLink,
        continent_id: ContinentId,
        base_continent: &HashMap<BaseId, ContinentId>,
    ) -> Result<(), TopologyError> {
        if link.base_a == link.base_b {
            return Err(TopologyError::SelfLink {
                base: link.base_a,
                continent: continent_id,
            });
        }
        if link.continent_id != continent_id {
            return Err(TopologyError::LinkContinentMismatch {
                base_a: link.base_a,
                base_b: link.base_b,
                declared: link.continent_id,
                loaded: continent_id,
            });
        }
        for endpoint in [link.base_a, link.base_b] {
            if base_continent.get(&endpoint) != Some(&continent_id) {
                return Err(TopologyError::UnknownLinkEndpoint {
                    base_a: link.base_a,
                    base_b: link.base_b,
                    continent: continent_id,
                    missing: endpoint,
                });
            }
        }
        Ok(())
    }

    /// All continents in ascending-id order.
    pub fn continents(&self) -> impl Iterator<Item = &Continent> {
        self.continents.values()
    }

    /// Look up a continent by id.
    pub fn continent(&self, id: ContinentId) -> Option<&Continent> {
        self.continents.get(&id)
    }

    /// Look up a continent by its asset code.
    pub fn continent_by_code(&self, code: &str) -> Option<&Continent> {
        self.continents_by_code
            .get(code)
            .and_then(|id| self.continents.get(id))
    }

    /// All servers in ascending-id order.
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    /// Look up a server by id.
    pub fn server(&self, id: ServerId) -> Option<&Server> {
        self.servers.get(&id)
    }

    /// The bases of one continent, in ascending base-id order.
    pub fn bases_by_continent(&self, id: ContinentId) -> Result<&[Base], UnknownContinent> {
        self.bases
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(UnknownContinent(id))
    }

    /// The lattice links of one continent, ordered by endpoint ids.
    ///
    /// Both endpoints of every returned link are guaranteed to appear in
    /// [`bases_by_continent`](Self::bases_by_continent) for the same id.
    pub fn lattice_links(&self, id: ContinentId) -> Result<&[LatticeLink], UnknownContinent> {
        self.lattice
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(UnknownContinent(id))
    }

    /// The continent a base belongs to, if the base is loaded.
    pub fn continent_of_base(&self, base_id: BaseId) -> Option<ContinentId> {
        self.base_continent.get(&base_id).copied()
    }

    /// Continents the data source flags as tracked.
    pub fn tracked_continent_ids(&self) -> &BTreeSet<ContinentId> {
        &self.tracked_continents
    }

    /// Servers the data source flags as tracked.
    pub fn tracked_server_ids(&self) -> &BTreeSet<ServerId> {
        &self.tracked_servers
    }
}
