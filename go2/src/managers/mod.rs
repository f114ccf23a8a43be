//! Per-step managers: action in, observation and reward out.
//!
//! Each manager owns its own history and is only touched from the episode
//! driver, in the fixed order action -> (controller) -> sensor -> reward.

pub mod action;
pub mod reward;
pub mod sensor;

pub use action::{ActionManager, ActionSpec, AppliedAction};
pub use reward::{RewardBreakdown, RewardManager, RewardWeights};
pub use sensor::SensorManager;
