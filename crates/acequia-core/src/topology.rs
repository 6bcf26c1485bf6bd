//! Canal topology: which ordered region pairs have a direct canal.
//!
//! The network is a tiny static graph stored as a map from an ordered
//! `(from, to)` pair to the canal id that carries water along it. A missing
//! entry means no direct transfer is possible between the pair.
//!
//! The default acequia network is:
//!
//! | from -> to      | canal |
//! |-----------------|-------|
//! | North -> South  | 0     |
//! | South -> East   | 1     |
//! | North -> East   | 2     |
//! | East -> North   | 3     |

use std::collections::BTreeMap;

use acequia_types::{Canal, CanalId, RegionIndex, RegionRole};

/// Errors raised while building a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Two canals claim the same ordered region pair.
    #[error("duplicate link {from} -> {to} (canals {existing} and {duplicate})")]
    DuplicateLink {
        /// Source region.
        from: RegionIndex,
        /// Destination region.
        to: RegionIndex,
        /// Canal already registered for the pair.
        existing: CanalId,
        /// Canal that was rejected.
        duplicate: CanalId,
    },
}

/// Mapping from ordered region pairs to canal ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanalTopology {
    links: BTreeMap<(RegionIndex, RegionIndex), CanalId>,
}

impl CanalTopology {
    /// Create an empty topology (no routes at all).
    pub const fn new() -> Self {
        Self {
            links: BTreeMap::new(),
        }
    }

    /// The fixed three-region acequia network.
    pub fn acequia() -> Self {
        let table = [
            (RegionRole::North, RegionRole::South, CanalId(0)),
            (RegionRole::South, RegionRole::East, CanalId(1)),
            (RegionRole::North, RegionRole::East, CanalId(2)),
            (RegionRole::East, RegionRole::North, CanalId(3)),
        ];
        let links = table
            .into_iter()
            .map(|(from, to, canal)| ((from.index(), to.index()), canal))
            .collect();
        Self { links }
    }

    /// Derive a topology from the host's canal list.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateLink`] if two canals connect the
    /// same ordered pair.
    pub fn from_canals(canals: &[Canal]) -> Result<Self, TopologyError> {
        let mut topology = Self::new();
        for canal in canals {
            topology.add_link(canal.from, canal.to, canal.id)?;
        }
        Ok(topology)
    }

    /// Register a direct canal from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateLink`] if the pair already has a canal.
    pub fn add_link(
        &mut self,
        from: RegionIndex,
        to: RegionIndex,
        canal: CanalId,
    ) -> Result<(), TopologyError> {
        if let Some(&existing) = self.links.get(&(from, to)) {
            return Err(TopologyError::DuplicateLink {
                from,
                to,
                existing,
                duplicate: canal,
            });
        }
        self.links.insert((from, to), canal);
        Ok(())
    }

    /// Look up the canal for an ordered pair.
    pub fn canal_id(&self, from: RegionIndex, to: RegionIndex) -> Option<CanalId> {
        self.links.get(&(from, to)).copied()
    }

    /// Look up the canal for an ordered pair, treating ids the host does not
    /// hold (`id >= canal_count`) as no route.
    pub fn route(&self, from: RegionIndex, to: RegionIndex, canal_count: usize) -> Option<CanalId> {
        self.canal_id(from, to).filter(|canal| canal.get() < canal_count)
    }

    /// Iterate over `((from, to), canal)` entries in pair order.
    pub fn links(&self) -> impl Iterator<Item = ((RegionIndex, RegionIndex), CanalId)> + '_ {
        self.links.iter().map(|(&pair, &canal)| (pair, canal))
    }
}
