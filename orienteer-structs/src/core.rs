use crate::{config::EnvConfig, serializable_struct_with_getters};
use orienteer_utils::{jsonify, seed_from_str};
use serde::{Deserialize, Serialize};

serializable_struct_with_getters! {
    RolloutSettings {
        env: EnvConfig,
        batch_size: Vec<usize>,
        seed: String,
    }
}

impl RolloutSettings {
    /// Seed of episode `nonce`, derived from the canonical JSON of these
    /// settings.
    pub fn calc_seed(&self, nonce: u64) -> serde_json::Result<[u8; 32]> {
        Ok(seed_from_str(jsonify(self)?.as_str(), nonce))
    }
}
