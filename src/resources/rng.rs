use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source for sample attributes and reveal pacing.
/// Seeded from `--seed` when given so runs can be reproduced.
#[derive(Resource, Debug, Clone)]
pub struct FxRng(pub StdRng);

impl FxRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!("Using fixed RNG seed {}", seed);
                Self::seeded(seed)
            }
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for FxRng {
    fn default() -> Self {
        Self::from_seed_or_entropy(None)
    }
}
