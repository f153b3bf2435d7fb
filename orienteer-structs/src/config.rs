use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

serializable_struct_with_getters! {
    EnvConfig {
        num_loc: usize,
        min_loc: f32,
        max_loc: f32,
        min_prize: Option<f32>,
        max_prize: Option<f32>,
        capacities: Option<BTreeMap<usize, f32>>,
    }
}

impl EnvConfig {
    pub const DEFAULT_MIN_PRIZE: f32 = 0.01;
    pub const DEFAULT_MAX_PRIZE: f32 = 1.01;

    pub fn new(num_loc: usize) -> Self {
        Self {
            num_loc,
            min_loc: 0.0,
            max_loc: 1.0,
            min_prize: None,
            max_prize: None,
            capacities: None,
        }
    }

    pub fn min_prize_or_default(&self) -> f32 {
        self.min_prize.unwrap_or(Self::DEFAULT_MIN_PRIZE)
    }

    pub fn max_prize_or_default(&self) -> f32 {
        self.max_prize.unwrap_or(Self::DEFAULT_MAX_PRIZE)
    }

    /// Budgets to add on top of the built-in calibration table.
    pub fn extra_capacities(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.capacities
            .iter()
            .flat_map(|c| c.iter().map(|(&n, &capacity)| (n, capacity)))
    }
}
