//! Thread-safe consistent hash ring
//!
//! Writers (`add_server` / `remove_server`) take the topology lock
//! exclusively; lookups share it. Observer callbacks fire after the lock is
//! dropped.

use crate::analysis::distribution::{DistributionAnalyzer, DistributionStats};
use crate::common::config::RingConfig;
use crate::common::hash::HashFunction;
use crate::common::utils::validate_server_id;
use crate::ring::observer::{NoopObserver, RingEvent, RingObserver};
use crate::ring::snapshot::RingSnapshot;
use crate::ring::topology::{AddReport, RemoveReport, RingTopology};
use crate::ring::vnode::VirtualNodeGenerator;
use crate::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Consistent hash ring routing keys to named servers.
///
/// Each server contributes `virtual_nodes` positions on a `u32` ring. A key
/// belongs to the first position clockwise from its hash (inclusive),
/// wrapping from the largest position to the smallest.
pub struct HashRing {
    virtual_nodes: usize,
    hasher: Arc<dyn HashFunction>,
    generator: VirtualNodeGenerator,
    topology: RwLock<RingTopology>,
    observer: Arc<dyn RingObserver>,
}

impl HashRing {
    /// Ring with `virtual_nodes` per server and the default hasher
    pub fn new(virtual_nodes: usize) -> Result<Self> {
        Self::with_config(&RingConfig {
            virtual_nodes,
            ..Default::default()
        })
    }

    pub fn with_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        let hasher = config.hash.hasher();
        Ok(Self {
            virtual_nodes: config.virtual_nodes,
            generator: VirtualNodeGenerator::new(Arc::clone(&hasher), config.separator),
            hasher,
            topology: RwLock::new(RingTopology::new()),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Replace the hash function.
    ///
    /// Fails with [`Error::InvalidConfig`] once servers have been added, since
    /// their positions were computed by the previous hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn HashFunction>) -> Result<Self> {
        if !self.read().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "cannot switch hasher to {} on a populated ring",
                hasher.name()
            )));
        }
        self.generator = VirtualNodeGenerator::new(Arc::clone(&hasher), self.generator.separator());
        self.hasher = hasher;
        Ok(self)
    }

    pub fn with_observer(mut self, observer: Arc<dyn RingObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, RingTopology> {
        // Topology mutations cannot panic halfway, so a poisoned lock still
        // guards a consistent ring.
        self.topology.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RingTopology> {
        self.topology.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place all virtual nodes of `server` on the ring.
    ///
    /// Positions that are already taken are overwritten (last write wins)
    /// and listed in the report's `collisions`; the remaining virtual nodes
    /// are still inserted.
    pub fn add_server(&self, server: &str) -> Result<AddReport> {
        validate_server_id(server, self.generator.separator())?;
        let vnodes = self.generator.generate(server, self.virtual_nodes);

        let (report, ring_size) = {
            let mut topology = self.write();
            let report = topology.insert(server, vnodes);
            (report, topology.len())
        };

        for collision in &report.collisions {
            warn!(
                server,
                position = collision.position,
                previous = %collision.previous_owner,
                "virtual node position collision, last write wins"
            );
            self.observer.on_event(&RingEvent::PositionCollision(collision));
        }
        debug!(
            server,
            inserted = report.inserted,
            collisions = report.collisions.len(),
            ring_size,
            "added server"
        );
        self.observer.on_event(&RingEvent::ServerAdded {
            server,
            inserted: report.inserted,
            collisions: report.collisions.len(),
            ring_size,
        });

        Ok(report)
    }

    /// Remove `server` and all of its virtual nodes.
    ///
    /// Fails with [`Error::UnknownServer`] if the server is not on the ring;
    /// the ring is left unchanged in that case.
    pub fn remove_server(&self, server: &str) -> Result<RemoveReport> {
        let (report, ring_size) = {
            let mut topology = self.write();
            let report = topology
                .remove(server)
                .ok_or_else(|| Error::UnknownServer(server.to_string()))?;
            (report, topology.len())
        };

        debug!(server, removed = report.removed, ring_size, "removed server");
        self.observer.on_event(&RingEvent::ServerRemoved {
            server,
            removed: report.removed,
            ring_size,
        });

        Ok(report)
    }

    /// Server owning `key`
    pub fn lookup(&self, key: &str) -> Result<String> {
        let hash = self.hasher.hash(key.as_bytes());
        let server = self.lookup_hash(hash)?;
        self.observer.on_event(&RingEvent::Lookup {
            key,
            hash,
            server: &server,
        });
        Ok(server)
    }

    /// Server owning a raw hash value
    pub fn lookup_hash(&self, hash: u32) -> Result<String> {
        self.read()
            .successor(hash)
            .map(|(_, server)| server.to_string())
            .ok_or(Error::EmptyRing)
    }

    /// Hash a key with this ring's hash function
    pub fn hash_key(&self, key: &str) -> u32 {
        self.hasher.hash(key.as_bytes())
    }

    /// Consistent frozen copy of the current ring
    pub fn snapshot(&self) -> RingSnapshot {
        RingSnapshot::capture(&self.read(), Arc::clone(&self.hasher))
    }

    /// Route every key against one snapshot and summarise the load per server
    pub fn analyze<I, K>(&self, keys: I) -> Result<DistributionStats>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let snapshot = self.snapshot();
        let mut analyzer = DistributionAnalyzer::new();
        for key in keys {
            analyzer.record(snapshot.lookup(key.as_ref())?);
        }
        let stats = analyzer.finish();

        self.observer.on_event(&RingEvent::BatchRouted {
            keys: stats.total_keys,
            ring_size: snapshot.len(),
        });
        Ok(stats)
    }

    pub fn contains_server(&self, server: &str) -> bool {
        self.read().contains_server(server)
    }

    /// Servers on the ring, sorted
    pub fn servers(&self) -> Vec<String> {
        let mut servers: Vec<String> = self.read().servers().map(|s| s.to_string()).collect();
        servers.sort();
        servers
    }

    pub fn server_count(&self) -> usize {
        self.read().server_count()
    }

    /// Total virtual nodes on the ring
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted positions currently owned by `server`
    pub fn positions_of(&self, server: &str) -> Option<Vec<u32>> {
        self.read().positions_of(server).map(|p| p.to_vec())
    }

    pub fn virtual_nodes_per_server(&self) -> usize {
        self.virtual_nodes
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("virtual_nodes", &self.virtual_nodes)
            .field("hasher", &self.hasher.name())
            .field("servers", &self.server_count())
            .field("ring_size", &self.len())
            .finish()
    }
}
