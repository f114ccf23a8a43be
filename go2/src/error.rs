//! Error types for the control loop and its configuration.

use thiserror::Error;

use crate::env::EpisodeState;

/// Caller-protocol violations. Everything else in the loop is absorbed with a
/// default (missing body, degenerate geometry, out-of-range actions).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvError {
    /// `step` was called outside a running episode (never reset, or already done).
    #[error("step called while episode is {state:?}; call reset() first")]
    NotRunning { state: EpisodeState },

    /// An action vector did not carry the expected number of components.
    #[error("action has {actual} components, expected {expected}")]
    ActionDimension { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
