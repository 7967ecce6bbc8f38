//! Ring topology: ordered positions plus a per-server position index

use crate::ring::vnode::VirtualNode;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A virtual node written over a position that was already occupied.
///
/// The later write wins. Collisions degrade uniformity (the previous owner
/// loses part of its share), so they are reported rather than hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionCollision {
    pub position: u32,
    pub previous_owner: Arc<str>,
    pub new_owner: Arc<str>,
    /// 1-based virtual node index of the incoming node
    pub vnode_index: usize,
}

impl PositionCollision {
    /// Both nodes belong to the same server (re-add, or two of its labels hashed alike)
    pub fn is_self_collision(&self) -> bool {
        self.previous_owner == self.new_owner
    }
}

/// Outcome of adding a server
#[derive(Debug, Clone, Serialize)]
pub struct AddReport {
    pub server: String,
    /// Positions that were free before this add
    pub inserted: usize,
    pub collisions: Vec<PositionCollision>,
}

impl AddReport {
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// Outcome of removing a server
#[derive(Debug, Clone, Serialize)]
pub struct RemoveReport {
    pub server: String,
    pub removed: usize,
}

/// Position map and server index, kept consistent on every mutation:
/// `servers[s]` holds exactly the positions whose owner is `s`.
#[derive(Debug, Default, Clone)]
pub struct RingTopology {
    positions: BTreeMap<u32, Arc<str>>,
    servers: HashMap<Arc<str>, Vec<u32>>,
}

impl RingTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert all virtual nodes of `server`
    pub fn insert(&mut self, server: &str, vnodes: Vec<VirtualNode>) -> AddReport {
        let mut owned = self.servers.remove(server).unwrap_or_default();
        let mut inserted = 0;
        let mut collisions = Vec::new();

        for (i, vnode) in vnodes.into_iter().enumerate() {
            let position = vnode.position;
            match self.positions.insert(position, Arc::clone(&vnode.server)) {
                None => {
                    inserted += 1;
                    owned.push(position);
                }
                Some(previous) => {
                    if previous != vnode.server {
                        if let Some(loser) = self.servers.get_mut(&*previous) {
                            loser.retain(|p| *p != position);
                        }
                        owned.push(position);
                    }
                    collisions.push(PositionCollision {
                        position,
                        previous_owner: previous,
                        new_owner: vnode.server,
                        vnode_index: i + 1,
                    });
                }
            }
        }

        owned.sort_unstable();
        self.servers.insert(Arc::from(server), owned);

        AddReport {
            server: server.to_string(),
            inserted,
            collisions,
        }
    }

    /// Remove every position owned by `server`; `None` if it was never added
    pub fn remove(&mut self, server: &str) -> Option<RemoveReport> {
        let owned = self.servers.remove(server)?;
        let mut removed = 0;

        for position in owned {
            if self.positions.remove(&position).is_some() {
                removed += 1;
            }
        }

        Some(RemoveReport {
            server: server.to_string(),
            removed,
        })
    }

    /// First position clockwise from `hash` (inclusive), wrapping to the minimum
    pub fn successor(&self, hash: u32) -> Option<(u32, &Arc<str>)> {
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(position, server)| (*position, server))
    }

    /// Number of virtual nodes on the ring
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn contains_server(&self, server: &str) -> bool {
        self.servers.contains_key(server)
    }

    pub fn servers(&self) -> impl Iterator<Item = &Arc<str>> {
        self.servers.keys()
    }

    /// Sorted positions currently owned by `server`
    pub fn positions_of(&self, server: &str) -> Option<&[u32]> {
        self.servers.get(server).map(|v| v.as_slice())
    }

    /// All (position, owner) pairs in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Arc<str>)> {
        self.positions.iter().map(|(p, s)| (*p, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnodes(server: &str, positions: &[u32]) -> Vec<VirtualNode> {
        let owner: Arc<str> = Arc::from(server);
        positions
            .iter()
            .map(|&position| VirtualNode {
                position,
                server: Arc::clone(&owner),
            })
            .collect()
    }

    #[test]
    fn test_insert_and_successor() {
        let mut topo = RingTopology::new();
        topo.insert("A", vnodes("A", &[10]));
        topo.insert("B", vnodes("B", &[50]));
        topo.insert("C", vnodes("C", &[90]));

        assert_eq!(topo.successor(30).map(|(p, s)| (p, &**s)), Some((50, "B")));
        assert_eq!(topo.successor(50).map(|(p, s)| (p, &**s)), Some((50, "B")));
        assert_eq!(topo.successor(95).map(|(p, s)| (p, &**s)), Some((10, "A")));
        assert_eq!(topo.successor(0).map(|(p, s)| (p, &**s)), Some((10, "A")));
    }

    #[test]
    fn test_successor_empty() {
        assert!(RingTopology::new().successor(1).is_none());
    }

    #[test]
    fn test_collision_with_other_server_last_write_wins() {
        let mut topo = RingTopology::new();
        topo.insert("A", vnodes("A", &[10, 20]));
        let report = topo.insert("B", vnodes("B", &[20, 30]));

        assert_eq!(report.inserted, 1);
        assert_eq!(report.collisions.len(), 1);
        let collision = &report.collisions[0];
        assert_eq!(collision.position, 20);
        assert_eq!(&*collision.previous_owner, "A");
        assert_eq!(&*collision.new_owner, "B");
        assert_eq!(collision.vnode_index, 1);
        assert!(!collision.is_self_collision());

        assert_eq!(topo.successor(15).map(|(_, s)| &**s), Some("B"));
        assert_eq!(topo.positions_of("A"), Some(&[10][..]));
        assert_eq!(topo.positions_of("B"), Some(&[20, 30][..]));
    }

    #[test]
    fn test_removing_collision_loser_keeps_winner_position() {
        let mut topo = RingTopology::new();
        topo.insert("A", vnodes("A", &[10, 20]));
        topo.insert("B", vnodes("B", &[20, 30]));

        let report = topo.remove("A").unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(topo.len(), 2);
        assert_eq!(topo.successor(15).map(|(_, s)| &**s), Some("B"));
    }

    #[test]
    fn test_readd_reports_self_collisions() {
        let mut topo = RingTopology::new();
        topo.insert("A", vnodes("A", &[10, 20, 30]));
        let report = topo.insert("A", vnodes("A", &[10, 20, 30]));

        assert_eq!(report.inserted, 0);
        assert_eq!(report.collisions.len(), 3);
        assert!(report.collisions.iter().all(|c| c.is_self_collision()));
        assert_eq!(topo.len(), 3);
        assert_eq!(topo.positions_of("A"), Some(&[10, 20, 30][..]));
    }

    #[test]
    fn test_intra_server_duplicate_position() {
        let mut topo = RingTopology::new();
        let report = topo.insert("A", vnodes("A", &[40, 40]));

        assert_eq!(report.inserted, 1);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(topo.positions_of("A"), Some(&[40][..]));
        assert_eq!(topo.remove("A").unwrap().removed, 1);
        assert!(topo.is_empty());
    }

    #[test]
    fn test_remove_unknown() {
        let mut topo = RingTopology::new();
        assert!(topo.remove("ghost").is_none());
    }
}
