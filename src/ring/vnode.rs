//! Virtual node generation
//!
//! A server id expands into `count` positions: the i-th one (1-based) is
//! `hash("{server}{separator}{i}")`. Regenerating with the same inputs gives
//! the same positions.

use crate::common::hash::HashFunction;
use std::fmt::Write;
use std::sync::Arc;

/// One position on the ring owned by a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    pub position: u32,
    pub server: Arc<str>,
}

pub struct VirtualNodeGenerator {
    hasher: Arc<dyn HashFunction>,
    separator: char,
}

impl VirtualNodeGenerator {
    pub fn new(hasher: Arc<dyn HashFunction>, separator: char) -> Self {
        Self { hasher, separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Virtual nodes for `server`, in sequence order 1..=count
    pub fn generate(&self, server: &str, count: usize) -> Vec<VirtualNode> {
        let owner: Arc<str> = Arc::from(server);
        let mut label = String::with_capacity(server.len() + 8);

        (1..=count)
            .map(|index| {
                label.clear();
                let _ = write!(label, "{}{}{}", server, self.separator, index);
                VirtualNode {
                    position: self.hasher.hash(label.as_bytes()),
                    server: Arc::clone(&owner),
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for VirtualNodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualNodeGenerator")
            .field("hasher", &self.hasher.name())
            .field("separator", &self.separator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::hash::Blake3Hash;

    fn generator() -> VirtualNodeGenerator {
        VirtualNodeGenerator::new(Arc::new(Blake3Hash), '#')
    }

    #[test]
    fn test_generate_count_and_owner() {
        let vnodes = generator().generate("10.189.0.2", 50);
        assert_eq!(vnodes.len(), 50);
        assert!(vnodes.iter().all(|v| &*v.server == "10.189.0.2"));
    }

    #[test]
    fn test_generate_deterministic() {
        let a = generator().generate("cache-1", 100);
        let b = generator().generate("cache-1", 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_positions_follow_label_scheme() {
        let vnodes = generator().generate("s", 3);
        let hasher = Blake3Hash;
        assert_eq!(vnodes[0].position, hasher.hash(b"s#1"));
        assert_eq!(vnodes[1].position, hasher.hash(b"s#2"));
        assert_eq!(vnodes[2].position, hasher.hash(b"s#3"));
    }

    #[test]
    fn test_prefix_is_stable() {
        // Growing the count only appends positions
        let short = generator().generate("s", 10);
        let long = generator().generate("s", 20);
        assert_eq!(&long[..10], &short[..]);
    }

    #[test]
    fn test_separator_changes_positions() {
        let hash_sep = generator().generate("s", 5);
        let pipe_sep = VirtualNodeGenerator::new(Arc::new(Blake3Hash), '|').generate("s", 5);
        assert_ne!(hash_sep, pipe_sep);
    }
}
