use crate::orienteering::{distance, CapacityTable, Instance, State, Tours};
use anyhow::Result;
use serde_json::{Map, Value};

pub fn solve_challenge(
    instance: &Instance,
    capacities: &CapacityTable,
    save_solution: &dyn Fn(&Tours) -> Result<()>,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let (_, tours) = instance.rollout(capacities, select_actions)?;
    save_solution(&tours)
}

/// Picks the legal node with the most prize per unit of travel, or the
/// depot when nothing else is legal.
pub fn select_actions(state: &State) -> Vec<usize> {
    (0..state.batch_size())
        .map(|b| {
            let row = b * state.num_nodes;
            let here = state.locs[row + state.current_node[b]];
            let mut best = (0, f32::NEG_INFINITY);
            for (node, &legal) in state.mask_of(b).iter().enumerate().skip(1) {
                if !legal {
                    continue;
                }
                let edge = distance(here, state.locs[row + node]).max(f32::EPSILON);
                let score = state.prize[row + node] / edge;
                if score > best.1 {
                    best = (node, score);
                }
            }
            best.0
        })
        .collect()
}
