use super::{distance, CapacityTable, Instance, State, Tours};
use crate::error::{EnvError, Result, ValidationError};

/// Slack allowed on the tour length before the budget counts as exceeded.
pub const LENGTH_TOLERANCE: f32 = 1e-5;
const PRIZE_TOLERANCE: f32 = 1e-5;

fn check_tour_count(tours: &Tours, batch_size: usize) -> Result<()> {
    if tours.tours.len() != batch_size {
        return Err(EnvError::Batch(format!(
            "got {} tours for a batch of {}",
            tours.tours.len(),
            batch_size
        )));
    }
    Ok(())
}

/// Validates one depot-to-depot tour and returns its length.
fn check_tour(
    instance: usize,
    tour: &[usize],
    num_nodes: usize,
    capacity: f32,
    location: impl Fn(usize) -> [f32; 2],
) -> Result<f32> {
    if let Some(&node) = tour.iter().find(|&&node| node >= num_nodes) {
        return Err(ValidationError::NodeOutOfRange { instance, node }.into());
    }

    let mut sorted = tour.to_vec();
    sorted.sort_unstable();
    if let Some(w) = sorted.windows(2).find(|w| w[1] != 0 && w[1] == w[0]) {
        return Err(ValidationError::DuplicateVisit {
            instance,
            node: w[1],
        }
        .into());
    }

    let length = match (tour.first(), tour.last()) {
        (Some(&first), Some(&last)) => {
            let depot = location(0);
            distance(depot, location(first))
                + tour
                    .windows(2)
                    .map(|w| distance(location(w[0]), location(w[1])))
                    .sum::<f32>()
                + distance(location(last), depot)
        }
        _ => 0.0,
    };
    if length > capacity + LENGTH_TOLERANCE {
        return Err(ValidationError::MaxLengthExceeded {
            instance,
            length,
            capacity,
            excess: length - capacity,
        }
        .into());
    }
    Ok(length)
}

impl State {
    /// Checks every tour against this episode's locations and budget and
    /// returns the tour lengths.
    pub fn validate_tours(&self, tours: &Tours) -> Result<Vec<f32>> {
        check_tour_count(tours, self.batch_size())?;
        tours
            .tours
            .iter()
            .enumerate()
            .map(|(b, tour)| {
                let row = &self.locs[b * self.num_nodes..(b + 1) * self.num_nodes];
                check_tour(b, tour, self.num_nodes, self.capacity, |node| row[node]).map_err(
                    |e| {
                        tracing::warn!(instance = b, "tour rejected: {}", e);
                        e
                    },
                )
            })
            .collect()
    }

    /// Validates `tours` and returns the prize collected by each instance.
    pub fn get_reward(&self, tours: &Tours) -> Result<Vec<f32>> {
        self.validate_tours(tours)?;
        Ok(self.prize_collected.clone())
    }
}

impl Instance {
    /// Validates `tours` against this batch alone and sums their prizes,
    /// without stepping a [`State`].
    pub fn evaluate_tours(&self, capacities: &CapacityTable, tours: &Tours) -> Result<Vec<f32>> {
        self.validate()?;
        let capacity = capacities.capacity_for(self.params.num_loc)?;
        check_tour_count(tours, self.batch_size())?;
        let num_nodes = self.params.num_nodes();
        tours
            .tours
            .iter()
            .enumerate()
            .map(|(b, tour)| -> Result<f32> {
                check_tour(b, tour, num_nodes, capacity, |node| self.node_location(b, node))?;
                Ok(tour
                    .iter()
                    .fold(0.0f32, |total, &node| total + self.node_prize(b, node)))
            })
            .collect()
    }

    /// Returns the live `prize_collected` of `state` once `tours` pass
    /// validation and agree with the prizes they visit in this batch.
    pub fn get_reward(
        &self,
        capacities: &CapacityTable,
        state: &State,
        tours: &Tours,
    ) -> Result<Vec<f32>> {
        let tracked = state.get_reward(tours)?;
        let recomputed = self.evaluate_tours(capacities, tours)?;
        for (instance, (&tracked, &recomputed)) in tracked.iter().zip(&recomputed).enumerate() {
            if (tracked - recomputed).abs() > PRIZE_TOLERANCE {
                tracing::warn!(instance, tracked, recomputed, "collected prize mismatch");
                return Err(ValidationError::PrizeMismatch {
                    instance,
                    tracked,
                    recomputed,
                }
                .into());
            }
        }
        Ok(tracked)
    }
}
