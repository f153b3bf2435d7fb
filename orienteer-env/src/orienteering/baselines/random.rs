use crate::orienteering::{CapacityTable, Instance, State, Tours};
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde_json::{Map, Value};

/// Uniformly random legal moves. Accepts an optional integer `seed`
/// hyperparameter; otherwise the instance seed drives the choices.
pub fn solve_challenge(
    instance: &Instance,
    capacities: &CapacityTable,
    save_solution: &dyn Fn(&Tours) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let mut rng = match hyperparameters.as_ref().and_then(|h| h.get("seed")) {
        Some(seed) => SmallRng::seed_from_u64(
            seed.as_u64()
                .ok_or_else(|| anyhow!("Hyperparameter 'seed' must be a non-negative integer"))?,
        ),
        None => SmallRng::from_seed(instance.seed.clone()),
    };
    let (_, tours) = instance.rollout(capacities, |state| select_actions(state, &mut rng))?;
    save_solution(&tours)
}

pub fn select_actions<R: Rng>(state: &State, rng: &mut R) -> Vec<usize> {
    (0..state.batch_size())
        .map(|b| {
            let legal: Vec<usize> = state
                .mask_of(b)
                .iter()
                .enumerate()
                .filter(|&(_, &legal)| legal)
                .map(|(node, _)| node)
                .collect();
            match legal.len() {
                0 => 0,
                n => legal[rng.gen_range(0..n)],
            }
        })
        .collect()
}
