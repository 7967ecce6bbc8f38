//! # miniring
//!
//! A consistent hash ring for routing keys to a dynamic set of servers:
//! - Virtual nodes per server for even load
//! - O(log V) lookup with wraparound
//! - Minimal key movement when servers join or leave
//! - Distribution analysis (mean / standard deviation of keys per server)
//!
//! ## Architecture
//!
//! ```text
//!  server ids ──► VirtualNodeGenerator ──► RingTopology (BTreeMap<u32, server>)
//!                                               │
//!  key ──► HashFunction ──► u32 ──► lookup ─────┘──► server
//!                                               │
//!  keys ──► RingSnapshot ──► DistributionAnalyzer ──► DistributionStats
//! ```
//!
//! ## Usage
//!
//! ```
//! use miniring::HashRing;
//!
//! let ring = HashRing::new(200)?;
//! ring.add_server("10.189.0.2")?;
//! ring.add_server("10.189.0.3")?;
//!
//! let server = ring.lookup("user:42")?;
//! assert!(ring.contains_server(&server));
//!
//! let stats = ring.analyze((0..1000).map(|i| format!("{}#test", i)))?;
//! assert_eq!(stats.total_keys, 1000);
//! # Ok::<(), miniring::Error>(())
//! ```
//!
//! ### Harness
//! ```bash
//! miniring --vnodes 200 simulate --keys 1000000 --add 10.189.0.12
//! miniring sweep --vnodes 1,10,100,1000
//! miniring lookup user:1 user:2
//! ```

pub mod analysis;
pub mod common;
pub mod ring;
pub mod workload;

// Re-export commonly used types
pub use analysis::{DistributionAnalyzer, DistributionStats, RemapSummary};
pub use common::{Config, Error, HashAlgorithm, HashFunction, Result, RingConfig};
pub use ring::{HashRing, RingEvent, RingObserver, RingSnapshot};
pub use workload::KeyGenerator;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
