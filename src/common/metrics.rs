//! Ring metrics
//!
//! Prometheus-compatible counters fed through the [`RingObserver`] hook:
//! - lookups served
//! - servers added / removed
//! - virtual node position collisions
//! - live virtual nodes

use crate::ring::observer::{RingEvent, RingObserver};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for tracking event counts
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Gauge for tracking current values
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn set(&self, v: u64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Metrics for one hash ring
#[derive(Debug, Default)]
pub struct RingMetrics {
    pub lookups_total: Counter,
    pub servers_added_total: Counter,
    pub servers_removed_total: Counter,
    pub collisions_total: Counter,
    pub virtual_nodes: Gauge,
}

impl RingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate Prometheus-compatible metrics output
    pub fn to_prometheus(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();

        let counters = [
            ("miniring_lookups_total", "Total number of key lookups", &self.lookups_total),
            ("miniring_servers_added_total", "Total servers added", &self.servers_added_total),
            (
                "miniring_servers_removed_total",
                "Total servers removed",
                &self.servers_removed_total,
            ),
            (
                "miniring_collisions_total",
                "Virtual node position collisions",
                &self.collisions_total,
            ),
        ];
        for (name, help, counter) in counters {
            let _ = writeln!(out, "# HELP {} {}", name, help);
            let _ = writeln!(out, "# TYPE {} counter", name);
            let _ = writeln!(out, "{} {}", name, counter.get());
        }

        out.push_str("# HELP miniring_virtual_nodes Virtual nodes currently on the ring\n");
        out.push_str("# TYPE miniring_virtual_nodes gauge\n");
        let _ = writeln!(out, "miniring_virtual_nodes {}", self.virtual_nodes.get());

        out
    }
}

impl RingObserver for RingMetrics {
    fn on_event(&self, event: &RingEvent<'_>) {
        match event {
            RingEvent::ServerAdded { ring_size, .. } => {
                self.servers_added_total.inc();
                self.virtual_nodes.set(*ring_size as u64);
            }
            RingEvent::ServerRemoved { ring_size, .. } => {
                self.servers_removed_total.inc();
                self.virtual_nodes.set(*ring_size as u64);
            }
            RingEvent::PositionCollision(_) => self.collisions_total.inc(),
            RingEvent::Lookup { .. } => self.lookups_total.inc(),
            RingEvent::BatchRouted { keys, .. } => self.lookups_total.add(*keys as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new();

        assert_eq!(counter.get(), 0);
        counter.inc();
        assert_eq!(counter.get(), 1);
        counter.add(5);
        assert_eq!(counter.get(), 6);
    }

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new();

        assert_eq!(gauge.get(), 0);
        gauge.set(10);
        assert_eq!(gauge.get(), 10);
    }

    #[test]
    fn test_ring_metrics_events() {
        let metrics = RingMetrics::new();

        metrics.on_event(&RingEvent::ServerAdded {
            server: "a",
            inserted: 3,
            collisions: 0,
            ring_size: 3,
        });
        metrics.on_event(&RingEvent::Lookup {
            key: "k",
            hash: 7,
            server: "a",
        });
        metrics.on_event(&RingEvent::BatchRouted {
            keys: 4,
            ring_size: 3,
        });
        metrics.on_event(&RingEvent::ServerRemoved {
            server: "a",
            removed: 3,
            ring_size: 0,
        });

        assert_eq!(metrics.servers_added_total.get(), 1);
        assert_eq!(metrics.servers_removed_total.get(), 1);
        assert_eq!(metrics.lookups_total.get(), 5);
        assert_eq!(metrics.virtual_nodes.get(), 0);

        let text = metrics.to_prometheus();
        assert!(text.contains("miniring_lookups_total 5"));
        assert!(text.contains("# TYPE miniring_virtual_nodes gauge"));
    }
}
