pub mod baselines;
mod capacity;
mod mask;
mod observation;
mod rollout;
mod state;
mod validation;

pub use capacity::CapacityTable;
pub use mask::{distance, feasibility_mask};
pub use observation::ObservationSpec;
pub use state::State;
pub use validation::LENGTH_TOLERANCE;

use crate::error::{ConfigError, EnvError, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Number of discrete prize tiers in `(0, 1]`.
pub const PRIZE_TIERS: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnvParams {
    pub num_loc: usize,
    pub min_loc: f32,
    pub max_loc: f32,
    pub min_prize: f32,
    pub max_prize: f32,
}

impl EnvParams {
    pub fn new(num_loc: usize) -> Self {
        Self {
            num_loc,
            min_loc: 0.0,
            max_loc: 1.0,
            min_prize: 0.01,
            max_prize: 1.01,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_loc == 0 {
            return Err(ConfigError::ZeroLocations.into());
        }
        if !(self.min_loc < self.max_loc) {
            return Err(ConfigError::InvalidBounds {
                field: "loc",
                min: self.min_loc,
                max: self.max_loc,
            }
            .into());
        }
        if !(self.min_prize <= self.max_prize) {
            return Err(ConfigError::InvalidBounds {
                field: "prize",
                min: self.min_prize,
                max: self.max_prize,
            }
            .into());
        }
        Ok(())
    }

    /// Nodes per instance, depot included.
    pub fn num_nodes(&self) -> usize {
        self.num_loc + 1
    }
}

/// Leading batch dimensions. Instances are stored flat in row-major order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchShape(pub Vec<usize>);

impl From<usize> for BatchShape {
    fn from(size: usize) -> Self {
        Self(vec![size])
    }
}

impl From<Vec<usize>> for BatchShape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for BatchShape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl BatchShape {
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn validate(&self) -> Result<()> {
        if self.size() == 0 {
            return Err(ConfigError::EmptyBatch(self.0.clone()).into());
        }
        Ok(())
    }
}

/// One action sequence per batch element. Depot entries (`0`) may repeat.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Tours {
    pub tours: Vec<Vec<usize>>,
}

impl Tours {
    pub fn new() -> Self {
        Self { tours: Vec::new() }
    }
}

/// A batch of orienteering problems.
///
/// `locs` and `prize` exclude the depot and hold `num_loc` entries per
/// instance; the depot is node `0` once the batch is reset into a [`State`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instance {
    pub seed: [u8; 32],
    pub params: EnvParams,
    pub batch_shape: BatchShape,
    pub depot: Vec<[f32; 2]>,
    pub locs: Vec<[f32; 2]>,
    pub prize: Vec<f32>,
}

impl Instance {
    pub fn generate_instance(
        seed: &[u8; 32],
        params: &EnvParams,
        batch_shape: &BatchShape,
    ) -> Result<Self> {
        params.validate()?;
        batch_shape.validate()?;
        let mut rng = StdRng::from_seed(seed.clone());
        let batch_size = batch_shape.size();
        let num_loc = params.num_loc;

        let mut depot = Vec::with_capacity(batch_size);
        let mut locs = Vec::with_capacity(batch_size * num_loc);
        let mut prize = Vec::with_capacity(batch_size * num_loc);
        for _ in 0..batch_size {
            let mut sample = || -> [f32; 2] {
                [
                    rng.gen_range(params.min_loc..params.max_loc),
                    rng.gen_range(params.min_loc..params.max_loc),
                ]
            };
            let instance_depot = sample();
            let instance_locs: Vec<[f32; 2]> = (0..num_loc).map(|_| sample()).collect();

            // Farther nodes are worth more, in PRIZE_TIERS discrete steps.
            let from_depot: Vec<f32> = instance_locs
                .iter()
                .map(|&loc| distance(instance_depot, loc))
                .collect();
            let max_distance = from_depot.iter().cloned().fold(0.0f32, f32::max);
            prize.extend(from_depot.iter().map(|&d| {
                let ratio = if max_distance > 0.0 {
                    d / max_distance
                } else {
                    0.0
                };
                (1 + (ratio * (PRIZE_TIERS - 1) as f32) as i32) as f32 / PRIZE_TIERS as f32
            }));

            depot.push(instance_depot);
            locs.extend(instance_locs);
        }

        tracing::debug!(batch_size, num_loc, "generated orienteering instances");
        Ok(Self {
            seed: seed.clone(),
            params: params.clone(),
            batch_shape: batch_shape.clone(),
            depot,
            locs,
            prize,
        })
    }

    /// Builds a batch from explicit coordinates and prizes.
    pub fn from_parts(
        params: &EnvParams,
        batch_shape: &BatchShape,
        depot: Vec<[f32; 2]>,
        locs: Vec<[f32; 2]>,
        prize: Vec<f32>,
    ) -> Result<Self> {
        let instance = Self {
            seed: [0u8; 32],
            params: params.clone(),
            batch_shape: batch_shape.clone(),
            depot,
            locs,
            prize,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Checks the parameters and that every per-node array matches the batch.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        self.batch_shape.validate()?;
        let batch_size = self.batch_shape.size();
        let num_entries = batch_size * self.params.num_loc;
        if self.depot.len() != batch_size
            || self.locs.len() != num_entries
            || self.prize.len() != num_entries
        {
            return Err(EnvError::Batch(format!(
                "expected {} depots and {} locations/prizes, got {}, {} and {}",
                batch_size,
                num_entries,
                self.depot.len(),
                self.locs.len(),
                self.prize.len()
            )));
        }
        Ok(())
    }

    pub fn batch_size(&self) -> usize {
        self.depot.len()
    }

    /// Location of `node` in instance `b`, with the depot at node `0`.
    pub fn node_location(&self, b: usize, node: usize) -> [f32; 2] {
        match node {
            0 => self.depot[b],
            _ => self.locs[b * self.params.num_loc + node - 1],
        }
    }

    /// Prize of `node` in instance `b`; the depot carries none.
    pub fn node_prize(&self, b: usize, node: usize) -> f32 {
        match node {
            0 => 0.0,
            _ => self.prize[b * self.params.num_loc + node - 1],
        }
    }

    pub fn reset(&self, capacities: &CapacityTable) -> Result<State> {
        self.validate()?;
        let capacity = capacities.capacity_for(self.params.num_loc)?;
        Ok(State::from_instance(self, capacity))
    }

    pub fn compute_greedy_baseline(&self, capacities: &CapacityTable) -> anyhow::Result<Tours> {
        let tours = RefCell::new(Tours::new());
        let save_solution_fn = |t: &Tours| -> anyhow::Result<()> {
            *tours.borrow_mut() = t.clone();
            Ok(())
        };
        baselines::greedy::solve_challenge(self, capacities, &save_solution_fn, &None)?;
        Ok(tours.into_inner())
    }
}

/// Owns the configuration and random stream for repeated episodes.
pub struct OrienteeringEnv {
    params: EnvParams,
    capacities: CapacityTable,
    batch_shape: BatchShape,
    rng: StdRng,
}

impl OrienteeringEnv {
    pub fn new(
        params: EnvParams,
        capacities: CapacityTable,
        batch_shape: BatchShape,
        seed: &[u8; 32],
    ) -> Result<Self> {
        params.validate()?;
        batch_shape.validate()?;
        capacities.capacity_for(params.num_loc)?;
        Ok(Self {
            params,
            capacities,
            batch_shape,
            rng: StdRng::from_seed(seed.clone()),
        })
    }

    pub fn params(&self) -> &EnvParams {
        &self.params
    }

    pub fn capacities(&self) -> &CapacityTable {
        &self.capacities
    }

    pub fn observation_spec(&self) -> Result<ObservationSpec> {
        let capacity = self.capacities.capacity_for(self.params.num_loc)?;
        Ok(ObservationSpec::new(&self.params, capacity))
    }

    /// Draws a fresh batch from the environment's random stream.
    pub fn generate_instance(&mut self) -> Result<Instance> {
        let seed: [u8; 32] = self.rng.gen();
        Instance::generate_instance(&seed, &self.params, &self.batch_shape)
    }

    /// Resets onto `instance`, or onto a freshly generated batch when `None`.
    pub fn reset(&mut self, instance: Option<Instance>) -> Result<(Instance, State)> {
        let instance = match instance {
            Some(instance) => instance,
            None => self.generate_instance()?,
        };
        let state = instance.reset(&self.capacities)?;
        Ok((instance, state))
    }

    pub fn render(&self, _state: &State) -> Result<()> {
        Err(EnvError::Unimplemented("render"))
    }
}
