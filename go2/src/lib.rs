//! GO2 quadruped base: manager-based episodic control loop.
//!
//! A physics-free stand-in for a simulator task. A first-order velocity
//! controller moves the base, a sensor manager turns its pose into an
//! observation, and a reward manager scores every step.

pub mod config;
pub mod controller;
pub mod env;
pub mod error;
pub mod managers;
pub mod ml;
pub mod runner;

pub use config::{Go2Config, SpawnPose, TaskConfig};
pub use controller::{BaseController, Tracking, VelocityCommand};
pub use env::{EpisodeState, Go2Env, StepResult};
pub use error::{ConfigError, EnvError};
pub use managers::{ActionManager, ActionSpec, RewardBreakdown, RewardManager, SensorManager};
pub use ml::{Action, ConstantPolicy, Observation, Policy, RandomPolicy};
pub use runner::{rollout, RolloutSummary};
