//! Key movement between two ring states

use crate::ring::snapshot::RingSnapshot;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// How many keys changed owner between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemapSummary {
    pub total_keys: usize,
    pub moved: usize,
    /// Moved keys per previous owner
    pub moved_from: BTreeMap<String, usize>,
    /// Moved keys per new owner
    pub moved_to: BTreeMap<String, usize>,
}

impl RemapSummary {
    pub fn moved_fraction(&self) -> f64 {
        if self.total_keys == 0 {
            0.0
        } else {
            self.moved as f64 / self.total_keys as f64
        }
    }
}

/// Route `keys` against both snapshots and count owner changes
pub fn compare<I, K>(before: &RingSnapshot, after: &RingSnapshot, keys: I) -> Result<RemapSummary>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut summary = RemapSummary::default();

    for key in keys {
        let key = key.as_ref();
        let old = before.lookup(key)?;
        let new = after.lookup(key)?;
        summary.total_keys += 1;

        if old != new {
            summary.moved += 1;
            *summary.moved_from.entry(old.to_string()).or_insert(0) += 1;
            *summary.moved_to.entry(new.to_string()).or_insert(0) += 1;
        }
    }

    Ok(summary)
}
