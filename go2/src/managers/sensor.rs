//! Observation building from the base transform.
//!
//! Velocities come from finite differencing against the pose cached on the
//! previous call, so the first observation after a reset has no history and
//! reports zero motion.

use std::f32::consts::PI;

use go2_kinematics::transform;
use go2_kinematics::PoseProvider;
use nalgebra as na;

use crate::config::Go2Config;
use crate::ml::Observation;

/// Wrap an angle difference into [-pi, pi).
pub fn wrap_angle(delta: f32) -> f32 {
    (delta + PI).rem_euclid(2.0 * PI) - PI
}

/// Cosine between `up` and world +Z, or 1.0 for a degenerate (near-zero) axis.
pub fn up_dot(up: &na::Vector3<f32>) -> f32 {
    let norm = up.norm();
    if norm > Go2Config::MIN_UP_NORM {
        up.normalize().dot(&na::Vector3::z())
    } else {
        1.0
    }
}

/// Yaw-only quaternion (x, y, z, w)
pub fn yaw_quat(yaw: f32) -> [f32; 4] {
    let half = 0.5 * yaw;
    [0.0, 0.0, half.sin(), half.cos()]
}

pub struct SensorManager {
    body: String,
    prev: Option<(na::Vector3<f32>, f32)>,
}

impl SensorManager {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            prev: None,
        }
    }

    /// Forget the cached pose; the next observation reports zero velocity.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    pub fn has_history(&self) -> bool {
        self.prev.is_some()
    }

    pub fn observe<P: PoseProvider + ?Sized>(&mut self, poses: &P, dt: f32) -> Observation {
        // Missing body reads as identity
        let m = poses.read_or_identity(&self.body);
        let pos = transform::translation(&m);
        let yaw = transform::yaw(&m);
        let up_dot = up_dot(&transform::up_axis(&m));

        let (lin, ang_z) = match self.prev {
            None => (na::Vector3::zeros(), 0.0),
            Some((prev_pos, prev_yaw)) => {
                let dt = dt.max(Go2Config::MIN_DT);
                ((pos - prev_pos) / dt, wrap_angle(yaw - prev_yaw) / dt)
            }
        };

        self.prev = Some((pos, yaw));
        log::trace!("observe: pos={:?} yaw={:.4} ang_z={:.4}", pos, yaw, ang_z);

        Observation {
            base_lin_vel: [lin.x, lin.y, lin.z],
            base_ang_vel: [0.0, 0.0, ang_z],
            base_height: pos.z,
            imu_quat: yaw_quat(yaw),
            up_dot,
            yaw,
            pos: [pos.x, pos.y, pos.z],
        }
    }
}
