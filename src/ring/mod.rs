//! Consistent hash ring: virtual nodes, topology, lookup

pub mod hash_ring;
pub mod observer;
pub mod search;
pub mod snapshot;
pub mod topology;
pub mod vnode;

pub use hash_ring::HashRing;
pub use observer::{NoopObserver, RingEvent, RingObserver, TracingObserver};
pub use snapshot::RingSnapshot;
pub use topology::{AddReport, PositionCollision, RemoveReport};
pub use vnode::{VirtualNode, VirtualNodeGenerator};
