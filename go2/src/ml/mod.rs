pub mod policy;
pub mod types;

pub use policy::{ConstantPolicy, Policy, RandomPolicy};
pub use types::{Action, Observation};
