use super::{CapacityTable, Instance, State, Tours};
use crate::error::{EnvError, Result};

impl Instance {
    /// Resets the batch and steps it with `policy` until every instance is
    /// terminal and back at the depot.
    ///
    /// The policy must return one action per instance, and the depot for
    /// instances that are already terminal. Returns the final state together
    /// with the recorded action sequences.
    pub fn rollout<F>(&self, capacities: &CapacityTable, mut policy: F) -> Result<(State, Tours)>
    where
        F: FnMut(&State) -> Vec<usize>,
    {
        let mut state = self.reset(capacities)?;
        let mut tours = Tours {
            tours: vec![Vec::new(); state.batch_size()],
        };
        // Each step collects a distinct node or returns to the depot.
        let max_steps = 2 * state.num_nodes;
        let mut num_steps = 0;
        while !state.is_finished() {
            if num_steps == max_steps {
                return Err(EnvError::Batch(format!(
                    "policy did not bring every instance home within {} steps",
                    max_steps
                )));
            }
            let actions = policy(&state);
            state.step(&actions)?;
            for (tour, &action) in tours.tours.iter_mut().zip(&actions) {
                tour.push(action);
            }
            num_steps += 1;
        }
        tracing::debug!(
            num_steps,
            batch_size = state.batch_size(),
            "rollout finished"
        );
        Ok((state, tours))
    }
}
