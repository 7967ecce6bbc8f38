//! Immutable sorted view of a ring

use crate::common::hash::{blake3_hex, HashFunction};
use crate::ring::search::ring_search;
use crate::ring::topology::RingTopology;
use crate::{Error, Result};
use std::sync::Arc;

/// Frozen copy of the ring taken under one read lock.
///
/// Batch routing against a snapshot sees a single consistent topology even
/// while servers are being added or removed on the live ring.
#[derive(Clone)]
pub struct RingSnapshot {
    positions: Vec<u32>,
    owners: Vec<Arc<str>>,
    hasher: Arc<dyn HashFunction>,
}

impl RingSnapshot {
    pub(crate) fn capture(topology: &RingTopology, hasher: Arc<dyn HashFunction>) -> Self {
        let (positions, owners): (Vec<u32>, Vec<Arc<str>>) = topology
            .iter()
            .map(|(position, owner)| (position, Arc::clone(owner)))
            .unzip();
        Self {
            positions,
            owners,
            hasher,
        }
    }

    /// Server owning `key`
    pub fn lookup(&self, key: &str) -> Result<&str> {
        self.lookup_hash(self.hasher.hash(key.as_bytes()))
    }

    /// Server owning a raw hash value
    pub fn lookup_hash(&self, hash: u32) -> Result<&str> {
        ring_search(&self.positions, hash)
            .map(|idx| &*self.owners[idx])
            .ok_or(Error::EmptyRing)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sorted ring positions
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// BLAKE3 digest over (position, owner) pairs, hex encoded.
    ///
    /// Equal fingerprints mean two rings route every key identically.
    pub fn fingerprint(&self) -> String {
        let mut buf = Vec::with_capacity(self.positions.len() * 16);
        for (position, owner) in self.positions.iter().zip(&self.owners) {
            buf.extend_from_slice(&position.to_be_bytes());
            buf.extend_from_slice(owner.as_bytes());
            buf.push(0);
        }
        blake3_hex(&buf)
    }
}

impl std::fmt::Debug for RingSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingSnapshot")
            .field("virtual_nodes", &self.positions.len())
            .field("hasher", &self.hasher.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::hash::Blake3Hash;
    use crate::ring::vnode::VirtualNode;

    fn topology(entries: &[(&str, u32)]) -> RingTopology {
        let mut topo = RingTopology::new();
        for (server, position) in entries {
            topo.insert(
                server,
                vec![VirtualNode {
                    position: *position,
                    server: Arc::from(*server),
                }],
            );
        }
        topo
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let topo = topology(&[("C", 90), ("A", 10), ("B", 50)]);
        let snap = RingSnapshot::capture(&topo, Arc::new(Blake3Hash));
        assert_eq!(snap.positions(), &[10, 50, 90]);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn test_snapshot_lookup_hash() {
        let topo = topology(&[("A", 10), ("B", 50), ("C", 90)]);
        let snap = RingSnapshot::capture(&topo, Arc::new(Blake3Hash));
        assert_eq!(snap.lookup_hash(95).unwrap(), "A");
        assert_eq!(snap.lookup_hash(30).unwrap(), "B");
        assert_eq!(snap.lookup_hash(50).unwrap(), "B");
        assert_eq!(snap.lookup_hash(90).unwrap(), "C");
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = RingSnapshot::capture(&RingTopology::new(), Arc::new(Blake3Hash));
        assert!(snap.is_empty());
        assert!(matches!(snap.lookup("k"), Err(Error::EmptyRing)));
    }

    #[test]
    fn test_fingerprint() {
        let a = RingSnapshot::capture(&topology(&[("A", 10), ("B", 50)]), Arc::new(Blake3Hash));
        let b = RingSnapshot::capture(&topology(&[("B", 50), ("A", 10)]), Arc::new(Blake3Hash));
        let c = RingSnapshot::capture(&topology(&[("A", 10), ("C", 50)]), Arc::new(Blake3Hash));
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
