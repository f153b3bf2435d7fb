use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Travel budget per episode, keyed by the number of non-depot locations.
///
/// The budget is a calibration lookup and not a formula: node counts that
/// have no entry are rejected instead of interpolated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CapacityTable {
    entries: BTreeMap<usize, f32>,
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([(20, 2.0), (50, 3.0), (100, 4.0)]),
        }
    }
}

impl CapacityTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, num_loc: usize, capacity: f32) -> Self {
        self.entries.insert(num_loc, capacity);
        self
    }

    pub fn capacity_for(&self, num_loc: usize) -> Result<f32> {
        self.entries
            .get(&num_loc)
            .copied()
            .ok_or_else(|| ConfigError::UnsupportedNodeCount { num_loc }.into())
    }

    pub fn node_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }
}
