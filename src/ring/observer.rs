//! Observability hook for ring mutations and lookups

use crate::ring::topology::PositionCollision;

/// Something the ring did that a caller may want to see.
#[derive(Debug, Clone, Copy)]
pub enum RingEvent<'a> {
    ServerAdded {
        server: &'a str,
        inserted: usize,
        collisions: usize,
        /// Virtual nodes on the ring after the change
        ring_size: usize,
    },
    ServerRemoved {
        server: &'a str,
        removed: usize,
        ring_size: usize,
    },
    /// A virtual node landed on an occupied position (last write wins)
    PositionCollision(&'a PositionCollision),
    Lookup {
        key: &'a str,
        hash: u32,
        server: &'a str,
    },
    /// `keys` routed in one batch against a single snapshot
    BatchRouted { keys: usize, ring_size: usize },
}

/// Event sink injected into a [`HashRing`](crate::ring::HashRing).
///
/// Called after the ring lock is released, so implementations may query the
/// ring again.
pub trait RingObserver: Send + Sync {
    fn on_event(&self, event: &RingEvent<'_>);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RingObserver for NoopObserver {
    fn on_event(&self, _event: &RingEvent<'_>) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RingObserver for TracingObserver {
    fn on_event(&self, event: &RingEvent<'_>) {
        match event {
            RingEvent::ServerAdded {
                server,
                inserted,
                collisions,
                ring_size,
            } => tracing::info!(
                server,
                inserted,
                collisions,
                ring_size,
                "server added to ring"
            ),
            RingEvent::ServerRemoved {
                server,
                removed,
                ring_size,
            } => tracing::info!(server, removed, ring_size, "server removed from ring"),
            RingEvent::PositionCollision(collision) => tracing::warn!(
                position = collision.position,
                previous = %collision.previous_owner,
                winner = %collision.new_owner,
                "virtual node position collision"
            ),
            RingEvent::Lookup { key, hash, server } => {
                tracing::trace!(key, hash, server, "key routed")
            }
            RingEvent::BatchRouted { keys, ring_size } => {
                tracing::debug!(keys, ring_size, "key batch routed")
            }
        }
    }
}
