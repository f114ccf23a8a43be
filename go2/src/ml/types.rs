// Observation and Action types for the GO2 control loop

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// What the policy sees about the base after one control step.
///
/// Built fresh by the sensor manager each step and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// World-frame linear velocity from finite differencing
    pub base_lin_vel: [f32; 3],

    /// Angular velocity; only z (yaw rate) is populated
    pub base_ang_vel: [f32; 3],

    /// Height of the base above the world origin
    pub base_height: f32,

    /// Yaw-only quaternion (x, y, z, w), a deterministic IMU proxy
    pub imu_quat: [f32; 4],

    /// Cosine between the body up axis and world +Z
    pub up_dot: f32,

    /// Yaw in radians
    pub yaw: f32,

    pub pos: [f32; 3],
}

impl Observation {
    /// Resting observation: no motion, upright, identity orientation
    pub fn zero() -> Self {
        Self {
            base_lin_vel: [0.0; 3],
            base_ang_vel: [0.0; 3],
            base_height: 0.0,
            imu_quat: [0.0, 0.0, 0.0, 1.0],
            up_dot: 1.0,
            yaw: 0.0,
            pos: [0.0; 3],
        }
    }

    /// Flatten in field order for a policy network
    /// Total size: 3 + 3 + 1 + 4 + 1 + 1 + 3 = 16 floats
    pub fn to_vec(&self) -> Vec<f32> {
        let mut vec = Vec::with_capacity(Self::SIZE);
        vec.extend_from_slice(&self.base_lin_vel);
        vec.extend_from_slice(&self.base_ang_vel);
        vec.push(self.base_height);
        vec.extend_from_slice(&self.imu_quat);
        vec.push(self.up_dot);
        vec.push(self.yaw);
        vec.extend_from_slice(&self.pos);
        vec
    }

    pub const SIZE: usize = 16;
}

/// Raw policy action: forward, lateral and yaw components, nominally in [-1, 1].
///
/// Out-of-range values are accepted here and clamped by the action manager.
/// Non-finite components are read as 0 (see [`Action::sanitized`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub ax: f32,
    pub ay: f32,
    pub ayaw: f32,
}

impl Action {
    pub fn new(ax: f32, ay: f32, ayaw: f32) -> Self {
        Self { ax, ay, ayaw }
    }

    /// Build from a flat vector (e.g. network output).
    /// Extra trailing components are ignored; too few is an error.
    pub fn from_slice(vec: &[f32]) -> Result<Self, EnvError> {
        match vec {
            [ax, ay, ayaw, ..] => Ok(Self::new(*ax, *ay, *ayaw)),
            _ => Err(EnvError::ActionDimension {
                expected: Self::SIZE,
                actual: vec.len(),
            }),
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.ax, self.ay, self.ayaw]
    }

    /// Copy with NaN/inf components replaced by 0.
    pub fn sanitized(&self) -> Self {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self::new(finite_or_zero(self.ax), finite_or_zero(self.ay), finite_or_zero(self.ayaw))
    }

    pub fn is_finite(&self) -> bool {
        self.ax.is_finite() && self.ay.is_finite() && self.ayaw.is_finite()
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub const SIZE: usize = 3;
}

impl From<(f32, f32, f32)> for Action {
    fn from((ax, ay, ayaw): (f32, f32, f32)) -> Self {
        Self::new(ax, ay, ayaw)
    }
}

impl From<[f32; 3]> for Action {
    fn from([ax, ay, ayaw]: [f32; 3]) -> Self {
        Self::new(ax, ay, ayaw)
    }
}
