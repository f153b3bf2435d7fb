use super::{distance, feasibility_mask, BatchShape, Instance};
use crate::error::{EnvError, Result};
use serde::{Deserialize, Serialize};

/// Prizes at or below this are treated as already collected when resetting.
const RESET_PRIZE_EPSILON: f32 = 1e-5;

/// Simulation state of every instance in a batch.
///
/// Per-node fields are flat arrays of `batch_size * num_nodes` entries, node
/// `0` of each row being the depot. Per-instance fields hold one entry per
/// batch element.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct State {
    pub batch_shape: BatchShape,
    pub num_nodes: usize,
    /// Travel budget the episode started with.
    pub capacity: f32,
    pub locs: Vec<[f32; 2]>,
    pub length_to_depot: Vec<f32>,
    pub prize: Vec<f32>,
    pub action_mask: Vec<bool>,
    pub current_node: Vec<usize>,
    pub remaining_capacity: Vec<f32>,
    pub prize_collected: Vec<f32>,
    pub done: Vec<bool>,
}

impl State {
    pub(super) fn from_instance(instance: &Instance, capacity: f32) -> Self {
        let batch_size = instance.batch_size();
        let num_nodes = instance.params.num_nodes();
        let len = batch_size * num_nodes;

        let mut locs = Vec::with_capacity(len);
        let mut prize = Vec::with_capacity(len);
        for b in 0..batch_size {
            for node in 0..num_nodes {
                locs.push(instance.node_location(b, node));
                prize.push(instance.node_prize(b, node));
            }
        }
        let length_to_depot = locs
            .chunks(num_nodes)
            .flat_map(|row| row.iter().map(move |&loc| distance(loc, row[0])))
            .collect();

        let mut state = Self {
            batch_shape: instance.batch_shape.clone(),
            num_nodes,
            capacity,
            locs,
            length_to_depot,
            prize,
            action_mask: vec![false; len],
            current_node: vec![0; batch_size],
            remaining_capacity: vec![capacity; batch_size],
            prize_collected: vec![0.0; batch_size],
            done: vec![false; batch_size],
        };
        for b in 0..batch_size {
            state.refresh_mask(b, RESET_PRIZE_EPSILON);
        }
        tracing::debug!(
            batch_size,
            num_nodes,
            capacity,
            terminal = state.num_done(),
            "reset orienteering batch"
        );
        state
    }

    pub fn batch_size(&self) -> usize {
        self.current_node.len()
    }

    /// Applies one action per batch element.
    ///
    /// Actions are only range checked. Choosing a node the current mask
    /// forbids leaves the state numerically meaningless; use
    /// [`State::get_reward`] to validate finished tours. Terminal instances
    /// must be fed the depot, which leaves them terminal.
    pub fn step(&mut self, actions: &[usize]) -> Result<()> {
        if actions.len() != self.batch_size() {
            return Err(EnvError::Batch(format!(
                "got {} actions for a batch of {}",
                actions.len(),
                self.batch_size()
            )));
        }
        if let Some((b, &action)) = actions
            .iter()
            .enumerate()
            .find(|&(_, &action)| action >= self.num_nodes)
        {
            return Err(EnvError::Batch(format!(
                "action {} of instance {} is not a node (num_nodes: {})",
                action, b, self.num_nodes
            )));
        }

        for (b, &action) in actions.iter().enumerate() {
            let row = b * self.num_nodes;
            let from = self.locs[row + self.current_node[b]];
            let to = self.locs[row + action];

            self.prize_collected[b] += self.prize[row + action];
            self.prize[row + action] = 0.0;
            self.remaining_capacity[b] -= distance(from, to);
            self.current_node[b] = action;
            self.refresh_mask(b, 0.0);
        }
        Ok(())
    }

    fn refresh_mask(&mut self, b: usize, min_prize: f32) {
        let row = b * self.num_nodes..(b + 1) * self.num_nodes;
        self.done[b] = feasibility_mask(
            &self.locs[row.clone()],
            &self.length_to_depot[row.clone()],
            &self.prize[row.clone()],
            self.current_node[b],
            self.remaining_capacity[b],
            min_prize,
            &mut self.action_mask[row],
        );
    }

    pub fn mask_of(&self, b: usize) -> &[bool] {
        &self.action_mask[b * self.num_nodes..(b + 1) * self.num_nodes]
    }

    pub fn prize_of(&self, b: usize) -> &[f32] {
        &self.prize[b * self.num_nodes..(b + 1) * self.num_nodes]
    }

    pub fn num_done(&self) -> usize {
        self.done.iter().filter(|&&d| d).count()
    }

    /// Every instance is terminal and back at the depot.
    pub fn is_finished(&self) -> bool {
        self.done
            .iter()
            .zip(&self.current_node)
            .all(|(&done, &node)| done && node == 0)
    }

    /// Collected prize for terminal instances, `None` while still active.
    pub fn reward(&self) -> Vec<Option<f32>> {
        self.done
            .iter()
            .zip(&self.prize_collected)
            .map(|(&done, &collected)| done.then_some(collected))
            .collect()
    }
}
