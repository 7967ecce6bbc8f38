//! Load distribution statistics
//!
//! Groups (key, server) assignments by server and reports the mean key count
//! per server and the standard deviation of those counts. The deviation uses
//! an `n - 1` divisor and is undefined (reported as `-1`) below two servers.

use crate::common::utils::round_to;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reported in place of the standard deviation when it is undefined
pub const UNDEFINED_STD_DEVIATION: f64 = -1.0;

/// Decimal places kept in the reported standard deviation
pub const STD_DEVIATION_PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub total_keys: usize,
    /// Key count per server that received at least one key
    pub servers: BTreeMap<String, usize>,
    /// `total_keys / servers.len()`, or 0 when nothing was assigned
    pub mean: f64,
    /// Rounded to [`STD_DEVIATION_PRECISION`] places; `None` with fewer than two servers
    pub std_deviation: Option<f64>,
}

impl DistributionStats {
    fn from_counts(servers: BTreeMap<String, usize>) -> Self {
        let total_keys: usize = servers.values().sum();
        let n = servers.len();

        let mean = if n == 0 {
            0.0
        } else {
            total_keys as f64 / n as f64
        };

        let std_deviation = if n > 1 {
            let deviation_sum: f64 = servers
                .values()
                .map(|&count| {
                    let d = count as f64 - mean;
                    d * d
                })
                .sum();
            Some(round_to(
                (deviation_sum / (n - 1) as f64).sqrt(),
                STD_DEVIATION_PRECISION,
            ))
        } else {
            None
        };

        Self {
            total_keys,
            servers,
            mean,
            std_deviation,
        }
    }

    /// Standard deviation, or `-1` when undefined
    pub fn std_deviation_or_sentinel(&self) -> f64 {
        self.std_deviation.unwrap_or(UNDEFINED_STD_DEVIATION)
    }

    /// Servers that received at least one key
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn count_for(&self, server: &str) -> usize {
        self.servers.get(server).copied().unwrap_or(0)
    }

    pub fn min_count(&self) -> Option<usize> {
        self.servers.values().copied().min()
    }

    pub fn max_count(&self) -> Option<usize> {
        self.servers.values().copied().max()
    }

    /// Largest server load relative to the mean (1.0 is perfectly even)
    pub fn peak_to_mean(&self) -> Option<f64> {
        if self.mean == 0.0 {
            return None;
        }
        self.max_count().map(|max| max as f64 / self.mean)
    }
}

/// Incremental per-server counter
#[derive(Debug, Default)]
pub struct DistributionAnalyzer {
    counts: HashMap<String, usize>,
}

impl DistributionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one key assigned to `server`
    pub fn record(&mut self, server: &str) {
        match self.counts.get_mut(server) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(server.to_string(), 1);
            }
        }
    }

    pub fn finish(self) -> DistributionStats {
        DistributionStats::from_counts(self.counts.into_iter().collect())
    }

    /// Summarise a batch of (key, server) assignments
    pub fn analyze<I, K, S>(assignments: I) -> DistributionStats
    where
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str>,
    {
        let mut analyzer = Self::new();
        for (_key, server) in assignments {
            analyzer.record(server.as_ref());
        }
        analyzer.finish()
    }

    /// Summarise already-aggregated per-server counts (zero counts are skipped)
    pub fn from_counts<I, S>(counts: I) -> DistributionStats
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        DistributionStats::from_counts(
            counts
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(server, count)| (server.into(), count))
                .collect(),
        )
    }
}
