use go2_kinematics::transform;
use go2_kinematics::{BodyId, PoseError, PoseProvider};
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::config::Go2Config;

/// Body-frame velocity command: forward, lateral, yaw rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    pub vx: f32,
    pub vy: f32,
    pub wz: f32,
}

impl VelocityCommand {
    pub fn new(vx: f32, vy: f32, wz: f32) -> Self {
        Self { vx, vy, wz }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Clamp each axis to its limit (MAX_LIN for vx/vy, MAX_ANG for wz).
    /// A non-finite axis becomes 0 so it cannot poison the damped velocity.
    pub fn clamped(&self) -> Self {
        let limit = |v: f32, max: f32| if v.is_finite() { v.clamp(-max, max) } else { 0.0 };
        Self {
            vx: limit(self.vx, Go2Config::MAX_LIN),
            vy: limit(self.vy, Go2Config::MAX_LIN),
            wz: limit(self.wz, Go2Config::MAX_ANG),
        }
    }

    /// Exponential smoothing towards `target`: v = d*v + (1-d)*target
    pub fn damp_toward(&mut self, target: &VelocityCommand, damping: f32) {
        self.vx = damping * self.vx + (1.0 - damping) * target.vx;
        self.vy = damping * self.vy + (1.0 - damping) * target.vy;
        self.wz = damping * self.wz + (1.0 - damping) * target.wz;
    }

    pub fn scaled(&self, k: f32) -> Self {
        Self {
            vx: self.vx * k,
            vy: self.vy * k,
            wz: self.wz * k,
        }
    }

    /// Convert to array [vx, vy, wz]
    pub fn to_array(&self) -> [f32; 3] {
        [self.vx, self.vy, self.wz]
    }
}

/// Outcome of a controller call against the pose provider.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tracking {
    Tracked,
    /// Body absent; the call was a no-op.
    Missing,
    /// Body present but the provider refused the integrated pose.
    Rejected,
}

/// First-order velocity integrator for a yaw-only base.
///
/// Holds a target command and a damped velocity that chases it. No physics:
/// each `step` damps the velocity and writes the integrated pose straight
/// into the pose provider.
#[derive(Clone, Debug)]
pub struct BaseController {
    body: String,
    // Target, clamped at assignment
    cmd: VelocityCommand,
    // Damped velocity actually integrated
    vel: VelocityCommand,
}

impl BaseController {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            cmd: VelocityCommand::zero(),
            vel: VelocityCommand::zero(),
        }
    }

    pub fn body(&self) -> &BodyId {
        &self.body
    }

    pub fn command(&self) -> VelocityCommand {
        self.cmd
    }

    pub fn velocity(&self) -> VelocityCommand {
        self.vel
    }

    pub fn set_cmd(&mut self, vx: f32, vy: f32, wz: f32) {
        self.cmd = VelocityCommand::new(vx, vy, wz).clamped();
    }

    /// Zero the target and halve the current damped velocity.
    pub fn brake<P: PoseProvider + ?Sized>(&mut self, poses: &P) -> Tracking {
        if !poses.contains(&self.body) {
            log::debug!("brake: body {} missing, skipping", self.body);
            return Tracking::Missing;
        }
        self.cmd = VelocityCommand::zero();
        self.vel = self.vel.scaled(Go2Config::BRAKE_FACTOR);
        Tracking::Tracked
    }

    /// Damp the velocity and integrate one control period into the body pose.
    ///
    /// The written rotation is built from this step's yaw delta alone; the
    /// absolute yaw read from the provider is not carried forward.
    pub fn step<P: PoseProvider + ?Sized>(&mut self, poses: &mut P, dt: f32) -> Tracking {
        let Some(current) = poses.read_transform(&self.body) else {
            log::debug!("step: body {} missing, skipping", self.body);
            return Tracking::Missing;
        };

        let target = self.cmd;
        self.vel.damp_toward(&target, Go2Config::DAMPING);

        // Fresh rotation from this step's delta only (zero baseline).
        // TODO: accumulate yaw from `current` once the zero-baseline behaviour is confirmed unintended
        let yaw = self.vel.wz * dt;
        let pos = transform::translation(&current)
            + na::Vector3::new(self.vel.vx * dt, self.vel.vy * dt, 0.0);

        match poses.write_transform(&self.body, transform::from_yaw_translation(yaw, pos)) {
            Ok(()) => Tracking::Tracked,
            Err(PoseError::BodyNotFound(_)) => {
                log::debug!("step: body {} vanished before write", self.body);
                Tracking::Missing
            }
            Err(e) => {
                log::warn!("step: pose write rejected: {}", e);
                Tracking::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use go2_kinematics::{spawn_placeholder, Stage, GO2_DEFAULT_PATH};

    fn stage_with_body() -> Stage {
        let mut stage = Stage::new();
        spawn_placeholder(&mut stage, GO2_DEFAULT_PATH);
        stage
    }

    #[test]
    fn test_set_cmd_clamps_per_axis() {
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(5.0, -3.0, 9.0);
        assert_eq!(ctrl.command(), VelocityCommand::new(1.2, -1.2, 1.5));

        ctrl.set_cmd(-1.3, 1.21, -1.51);
        assert_eq!(ctrl.command(), VelocityCommand::new(-1.2, 1.2, -1.5));

        ctrl.set_cmd(0.3, -0.4, 1.0);
        assert_eq!(ctrl.command(), VelocityCommand::new(0.3, -0.4, 1.0));
        // Target only; damped velocity untouched
        assert_eq!(ctrl.velocity(), VelocityCommand::zero());
    }

    #[test]
    fn test_step_damps_and_integrates() {
        let mut stage = stage_with_body();
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(1.0, 0.5, 1.0);

        let dt = 0.1;
        assert_eq!(ctrl.step(&mut stage, dt), Tracking::Tracked);

        let vel = ctrl.velocity();
        assert_relative_eq!(vel.vx, 0.1, epsilon = 1e-6);
        assert_relative_eq!(vel.vy, 0.05, epsilon = 1e-6);
        assert_relative_eq!(vel.wz, 0.1, epsilon = 1e-6);

        let m = stage.read_transform(GO2_DEFAULT_PATH).unwrap();
        let pos = transform::translation(&m);
        assert_relative_eq!(pos.x, 0.01, epsilon = 1e-7);
        assert_relative_eq!(pos.y, 0.005, epsilon = 1e-7);
        assert_relative_eq!(pos.z, 0.4);
        assert_relative_eq!(transform::yaw(&m), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_is_rebuilt_from_zero_each_step() {
        let mut stage = stage_with_body();
        go2_kinematics::reset_pose(&mut stage, GO2_DEFAULT_PATH, [0.0, 0.0, 0.45], 2.0).unwrap();

        // No yaw command: previous absolute yaw is discarded
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        assert_eq!(ctrl.step(&mut stage, 0.02), Tracking::Tracked);
        let m = stage.read_transform(GO2_DEFAULT_PATH).unwrap();
        assert_relative_eq!(transform::yaw(&m), 0.0);
    }

    #[test]
    fn test_damping_converges_without_overshoot() {
        let mut stage = stage_with_body();
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(0.8, -0.6, 1.2);
        let target = ctrl.command();

        // Allow one rounding step of slack once the gap reaches f32 resolution
        let tol = 1e-6;
        let mut prev = ctrl.velocity();
        for _ in 0..100 {
            let _ = ctrl.step(&mut stage, 1.0 / 30.0);
            let v = ctrl.velocity();
            assert!(v.vx >= prev.vx - tol && v.vx <= target.vx + tol);
            assert!(v.vy <= prev.vy + tol && v.vy >= target.vy - tol);
            assert!(v.wz >= prev.wz - tol && v.wz <= target.wz + tol);
            prev = v;
        }
        assert_relative_eq!(prev.vx, target.vx, epsilon = 1e-4);
        assert_relative_eq!(prev.vy, target.vy, epsilon = 1e-4);
        assert_relative_eq!(prev.wz, target.wz, epsilon = 1e-4);
    }

    #[test]
    fn test_brake_halves_velocity_and_zeroes_target() {
        let mut stage = stage_with_body();
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(1.0, 1.0, 1.0);
        for _ in 0..5 {
            let _ = ctrl.step(&mut stage, 0.05);
        }
        let before = ctrl.velocity();

        assert_eq!(ctrl.brake(&stage), Tracking::Tracked);
        assert_eq!(ctrl.command(), VelocityCommand::zero());
        assert_relative_eq!(ctrl.velocity().vx, before.vx * 0.5);
        assert_relative_eq!(ctrl.velocity().vy, before.vy * 0.5);
        assert_relative_eq!(ctrl.velocity().wz, before.wz * 0.5);
    }

    #[test]
    fn test_missing_body_is_noop() {
        let mut stage = Stage::new();
        let mut ctrl = BaseController::new("/World/Missing");
        ctrl.set_cmd(1.0, 0.0, 0.0);

        assert_eq!(ctrl.step(&mut stage, 0.1), Tracking::Missing);
        assert_eq!(ctrl.velocity(), VelocityCommand::zero());
        assert!(stage.is_empty());

        assert_eq!(ctrl.brake(&stage), Tracking::Missing);
        // Target kept because brake did nothing
        assert_eq!(ctrl.command().vx, 1.0);
    }

    #[test]
    fn test_non_finite_command_reads_as_zero() {
        let mut stage = stage_with_body();
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(f32::NAN, f32::INFINITY, 0.5);
        assert_eq!(ctrl.command(), VelocityCommand::new(0.0, 0.0, 0.5));

        assert_eq!(ctrl.step(&mut stage, 0.1), Tracking::Tracked);
        let v = ctrl.velocity();
        assert!(v.vx.is_finite() && v.vy.is_finite() && v.wz.is_finite());
    }

    /// Accepts reads but refuses every write.
    struct ReadOnly(Stage);

    impl PoseProvider for ReadOnly {
        fn read_transform(&self, body: &BodyId) -> Option<go2_kinematics::Transform> {
            self.0.read_transform(body)
        }

        fn write_transform(
            &mut self,
            body: &BodyId,
            _: go2_kinematics::Transform,
        ) -> Result<(), PoseError> {
            Err(PoseError::NonFinite { body: body.to_string() })
        }
    }

    #[test]
    fn test_refused_write_is_not_reported_missing() {
        let mut poses = ReadOnly(stage_with_body());
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(1.0, 0.0, 0.0);
        assert_eq!(ctrl.step(&mut poses, 0.1), Tracking::Rejected);
    }

    #[test]
    fn test_translation_stays_in_world_axes_when_yawed() {
        let mut stage = stage_with_body();
        go2_kinematics::reset_pose(
            &mut stage,
            GO2_DEFAULT_PATH,
            [1.0, 2.0, 0.45],
            std::f32::consts::FRAC_PI_2,
        )
        .unwrap();

        // Pure forward command while facing world +y
        let mut ctrl = BaseController::new(GO2_DEFAULT_PATH);
        ctrl.set_cmd(1.0, 0.0, 0.0);
        assert_eq!(ctrl.step(&mut stage, 0.1), Tracking::Tracked);

        let pos = transform::translation(&stage.read_transform(GO2_DEFAULT_PATH).unwrap());
        assert_relative_eq!(pos.x, 1.0 + 0.01, epsilon = 1e-6);
        assert_relative_eq!(pos.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(pos.z, 0.45, epsilon = 1e-6);
    }

    #[test]
    fn test_command_damp_toward() {
        let mut v = VelocityCommand::zero();
        v.damp_toward(&VelocityCommand::new(1.0, -1.0, 0.5), 0.5);
        assert_eq!(v, VelocityCommand::new(0.5, -0.5, 0.25));
    }
}
