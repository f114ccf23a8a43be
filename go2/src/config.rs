use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::managers::ActionSpec;

pub struct Go2Config;

impl Go2Config {
    // Velocity limits applied when a command is assigned
    pub const MAX_LIN: f32 = 1.2; // m/s, forward and lateral
    pub const MAX_ANG: f32 = 1.5; // rad/s, yaw rate

    // Exponential smoothing factor for the damped velocity (0 < DAMPING < 1)
    pub const DAMPING: f32 = 0.9;

    // brake() keeps this fraction of the current damped velocity
    pub const BRAKE_FACTOR: f32 = 0.5;

    // Guards for finite differencing and normalisation
    pub const MIN_DT: f32 = 1e-6;
    pub const MIN_UP_NORM: f32 = 1e-6;

    // Spawn pose used by reset_pose and the placeholder env
    pub const SPAWN_HEIGHT: f32 = 0.45;

    pub const CONTROL_HZ: u32 = 30;
    pub const STEPS_PER_EPISODE: u64 = 200;
}

/// Initial base pose applied when an environment is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
}

impl Default for SpawnPose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: Go2Config::SPAWN_HEIGHT,
            yaw: 0.0,
        }
    }
}

impl SpawnPose {
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Task parameters supplied from outside the control loop.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "control_hz": 60, "steps_per_episode": 500, "action": { "scale_yaw": 1.0 } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub control_hz: u32,
    pub steps_per_episode: u64,
    pub action: ActionSpec,
    pub spawn: SpawnPose,
    pub body_path: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            control_hz: Go2Config::CONTROL_HZ,
            steps_per_episode: Go2Config::STEPS_PER_EPISODE,
            action: ActionSpec::default(),
            spawn: SpawnPose::default(),
            body_path: go2_kinematics::GO2_DEFAULT_PATH.to_string(),
        }
    }
}

impl TaskConfig {
    /// Fixed control period. A zero rate is treated as 1 Hz.
    pub fn dt(&self) -> f32 {
        1.0 / self.control_hz.max(1) as f32
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: TaskConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded task config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_episode == 0 {
            return Err(ConfigError::Invalid("steps_per_episode must be at least 1".into()));
        }
        for (name, value) in [
            ("action.scale_lin_xy", self.action.scale_lin_xy),
            ("action.scale_yaw", self.action.scale_yaw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("spawn.x", self.spawn.x),
            ("spawn.y", self.spawn.y),
            ("spawn.z", self.spawn.z),
            ("spawn.yaw", self.spawn.yaw),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.body_path.is_empty() {
            return Err(ConfigError::Invalid("body_path must not be empty".into()));
        }
        Ok(())
    }
}
