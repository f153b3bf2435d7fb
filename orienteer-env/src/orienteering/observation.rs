use super::{EnvParams, State, LENGTH_TOLERANCE};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Declared bounds of the observation fields and of the action.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObservationSpec {
    pub num_loc: usize,
    pub min_loc: f32,
    pub max_loc: f32,
    pub capacity: f32,
    pub max_length_to_depot: f32,
    pub min_prize: f32,
    pub max_prize: f32,
}

impl ObservationSpec {
    pub fn new(params: &EnvParams, capacity: f32) -> Self {
        let side = params.max_loc - params.min_loc;
        let diagonal = side.hypot(side);
        Self {
            num_loc: params.num_loc,
            min_loc: params.min_loc,
            max_loc: params.max_loc,
            capacity,
            max_length_to_depot: capacity.max(diagonal),
            min_prize: -1.0,
            max_prize: params.max_prize,
        }
    }

    /// Inclusive range of legal action indices.
    pub fn action_bounds(&self) -> (usize, usize) {
        (0, self.num_loc)
    }

    pub fn check(&self, state: &State) -> Result<()> {
        let num_nodes = state.num_nodes;
        for b in 0..state.batch_size() {
            let row = b * num_nodes..(b + 1) * num_nodes;
            let out_of_bounds = |field: &'static str| ConfigError::ObservationOutOfBounds {
                field,
                instance: b,
            };

            if state.locs[row.clone()].iter().flatten().any(|&c| {
                c < self.min_loc || c > self.max_loc
            }) {
                return Err(out_of_bounds("locations").into());
            }
            let remaining = state.remaining_capacity[b];
            if remaining < -LENGTH_TOLERANCE || remaining > self.capacity {
                return Err(out_of_bounds("remaining_capacity").into());
            }
            if state.length_to_depot[row.clone()]
                .iter()
                .any(|&l| l < 0.0 || l > self.max_length_to_depot)
            {
                return Err(out_of_bounds("length_to_depot").into());
            }
            if state.prize[row.clone()]
                .iter()
                .any(|&p| p < self.min_prize || p > self.max_prize)
            {
                return Err(out_of_bounds("prize").into());
            }
            if state.current_node[b] > self.num_loc {
                return Err(out_of_bounds("current_node").into());
            }
            if state.prize_collected[b] < 0.0 {
                return Err(out_of_bounds("prize_collected").into());
            }
        }
        Ok(())
    }
}
