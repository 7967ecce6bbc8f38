//! Common utilities and types shared across miniring

pub mod config;
pub mod error;
pub mod hash;
pub mod metrics;
pub mod utils;

pub use config::{Config, RingConfig, SimulationConfig};
pub use error::{Error, Result};
pub use hash::{blake3_hex, Blake3Hash, Crc32Hash, HashAlgorithm, HashFunction, Sha256Hash};
pub use metrics::RingMetrics;
pub use utils::{format_percent, round_to, validate_server_id};
