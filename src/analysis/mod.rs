//! Ring quality analysis
//!
//! - Distribution: per-server key counts, mean, standard deviation
//! - Remap: keys that change owner between two ring states

pub mod distribution;
pub mod remap;

pub use distribution::{DistributionAnalyzer, DistributionStats, UNDEFINED_STD_DEVIATION};
pub use remap::{compare, RemapSummary};
