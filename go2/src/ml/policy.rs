use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Action, Observation};

/// Anything that maps an observation to an action.
/// Can be backed by a trained network, a scripted gait or plain noise.
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> Action;
}

/// Uniform noise in [-1, 1] per component, seeded for reproducible previews
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        )
    }
}

/// Always returns the same action (e.g. "walk forward" or standing still)
pub struct ConstantPolicy(pub Action);

impl ConstantPolicy {
    pub fn standing() -> Self {
        Self(Action::zero())
    }
}

impl Policy for ConstantPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        self.0
    }
}
