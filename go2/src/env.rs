use go2_kinematics::{reset_pose, spawn_placeholder, PoseProvider, Stage};
use serde::{Deserialize, Serialize};

use crate::config::TaskConfig;
use crate::controller::{BaseController, Tracking};
use crate::error::EnvError;
use crate::managers::{ActionManager, RewardBreakdown, RewardManager, SensorManager};
use crate::ml::{Action, Observation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeState {
    /// Between episodes; `reset` is the only valid call
    Ready,
    Running,
}

/// Result of a single environment step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    /// `t >= steps_per_episode` after this step
    pub done: bool,
    pub breakdown: RewardBreakdown,
}

/// Fixed-length episodic control loop over a tracked base body.
///
/// One step runs, in order: action manager -> base controller -> sensor
/// manager -> reward manager. `dt` is fixed at construction, so a given
/// action sequence always produces the same trajectory.
pub struct Go2Env<P: PoseProvider> {
    poses: P,
    controller: BaseController,
    actions: ActionManager,
    sensors: SensorManager,
    rewards: RewardManager,
    dt: f32,
    t: u64,
    steps_per_episode: u64,
    state: EpisodeState,
}

impl Go2Env<Stage> {
    /// In-memory stage with a placeholder base at the configured spawn pose.
    pub fn placeholder(config: &TaskConfig) -> Self {
        let mut stage = Stage::new();
        let body = spawn_placeholder(&mut stage, &config.body_path);
        if let Err(e) = reset_pose(&mut stage, &body, config.spawn.position(), config.spawn.yaw) {
            // Just spawned, so only a non-finite spawn pose lands here
            log::warn!("Ignoring spawn pose: {}", e);
        }
        Self::new(stage, config)
    }
}

impl<P: PoseProvider> Go2Env<P> {
    pub fn new(poses: P, config: &TaskConfig) -> Self {
        let body = config.body_path.as_str();
        if !poses.contains(body) {
            log::warn!("Body {} not in pose provider; controller steps will be no-ops", body);
        }

        Self {
            poses,
            controller: BaseController::new(body),
            actions: ActionManager::new(config.action.clone()),
            sensors: SensorManager::new(body),
            rewards: RewardManager::new(),
            dt: config.dt(),
            t: 0,
            steps_per_episode: config.steps_per_episode,
            state: EpisodeState::Ready,
        }
    }

    /// Start a new episode and return its first observation.
    ///
    /// Brakes the controller rather than resetting the pose, and clears the
    /// manager histories so the first observation reports zero velocity.
    pub fn reset(&mut self) -> Observation {
        self.t = 0;
        self.state = EpisodeState::Running;
        self.actions.reset();
        self.rewards.reset();
        self.sensors.reset();

        if self.controller.brake(&self.poses) == Tracking::Missing {
            log::debug!("reset: nothing to brake");
        }

        let obs = self.sensors.observe(&self.poses, self.dt);
        log::info!(
            "Episode reset: pos={:?} yaw={:.3} steps_per_episode={}",
            obs.pos,
            obs.yaw,
            self.steps_per_episode
        );
        obs
    }

    pub fn step(&mut self, action: impl Into<Action>) -> Result<StepResult, EnvError> {
        if self.state != EpisodeState::Running {
            return Err(EnvError::NotRunning { state: self.state });
        }
        let action = action.into();

        // 1. Action -> clamped, scaled command
        let applied = self.actions.apply(&action, &mut self.controller);

        // 2. Integrate one control period; a missing body was logged already
        if self.controller.step(&mut self.poses, self.dt) == Tracking::Rejected {
            log::warn!("step t={}: provider rejected the base pose", self.t);
        }

        // 3. Observe and score
        let observation = self.sensors.observe(&self.poses, self.dt);
        let breakdown = self.rewards.compute(&observation, &action, Some(&applied));

        self.t += 1;
        let done = self.t >= self.steps_per_episode;
        if done {
            self.state = EpisodeState::Ready;
        }

        log::trace!("step t={} reward={:.4} done={}", self.t, breakdown.reward, done);

        Ok(StepResult {
            observation,
            reward: breakdown.reward,
            done,
            breakdown,
        })
    }

    /// Tear down and hand the pose provider back to the caller.
    pub fn close(self) -> P {
        log::info!("Closing env after {} steps", self.t);
        self.poses
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn steps_per_episode(&self) -> u64 {
        self.steps_per_episode
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.t >= self.steps_per_episode
    }

    pub fn provider(&self) -> &P {
        &self.poses
    }

    pub fn controller(&self) -> &BaseController {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use go2_kinematics::{transform, GO2_DEFAULT_PATH};

    fn short_task(steps: u64) -> TaskConfig {
        TaskConfig {
            steps_per_episode: steps,
            ..TaskConfig::default()
        }
    }

    #[test]
    fn test_step_before_reset_fails_fast() {
        let mut env = Go2Env::placeholder(&short_task(5));
        assert_eq!(
            env.step((1.0, 0.0, 0.0)).unwrap_err(),
            EnvError::NotRunning { state: EpisodeState::Ready }
        );
    }

    #[test]
    fn test_episode_terminates_after_steps() {
        let mut env = Go2Env::placeholder(&short_task(5));
        env.reset();
        for i in 1..=4 {
            let r = env.step((0.5, 0.0, 0.0)).unwrap();
            assert!(!r.done, "done early at step {}", i);
        }
        let r = env.step((0.5, 0.0, 0.0)).unwrap();
        assert!(r.done);
        assert_eq!(env.t(), 5);
        assert_eq!(env.state(), EpisodeState::Ready);

        // No auto-reset
        assert!(env.step((0.5, 0.0, 0.0)).is_err());
        assert_eq!(env.t(), 5);
    }

    #[test]
    fn test_reset_reports_zero_velocity_mid_motion() {
        let mut env = Go2Env::placeholder(&short_task(100));
        env.reset();
        for _ in 0..20 {
            env.step((1.0, 1.0, 1.0)).unwrap();
        }
        let moving = env.controller().velocity();

        let obs = env.reset();
        assert_eq!(obs.base_lin_vel, [0.0; 3]);
        assert_eq!(obs.base_ang_vel[2], 0.0);
        assert_eq!(env.t(), 0);
        // Brake halved the damped velocity
        assert_relative_eq!(env.controller().velocity().vx, moving.vx * 0.5);
        assert_eq!(env.controller().command().vx, 0.0);
    }

    #[test]
    fn test_forward_action_moves_base_forward() {
        let mut env = Go2Env::placeholder(&short_task(50));
        env.reset();
        let mut last = None;
        for _ in 0..30 {
            last = Some(env.step((1.0, 0.0, 0.0)).unwrap());
        }
        let last = last.unwrap();
        assert!(last.observation.base_lin_vel[0] > 0.0);
        assert!(last.breakdown.forward_progress > 0.0);
        assert!(last.observation.pos[0] > 0.0);
        assert_relative_eq!(last.observation.base_height, 0.45);
    }

    #[test]
    fn test_missing_body_degrades_gracefully() {
        let env_config = short_task(3);
        let mut env = Go2Env::new(Stage::new(), &env_config);
        let obs = env.reset();
        assert_eq!(obs.up_dot, 1.0);
        for _ in 0..3 {
            let r = env.step((1.0, 0.0, 0.0)).unwrap();
            assert_eq!(r.observation.pos, [0.0; 3]);
            assert_eq!(r.breakdown.forward_progress, 0.0);
        }
        assert!(env.is_done());
    }

    #[test]
    fn test_non_finite_action_does_not_freeze_base() {
        let mut env = Go2Env::placeholder(&short_task(5));
        env.reset();
        let r = env.step((f32::NAN, 0.0, f32::INFINITY)).unwrap();
        assert!(r.reward.is_finite());
        assert!(r.observation.to_vec().iter().all(|v| v.is_finite()));
        while !env.step((0.0, 0.0, 0.0)).unwrap().done {}

        let start = env.reset().pos;
        for _ in 0..4 {
            env.step((1.0, 0.0, 0.0)).unwrap();
        }
        let v = env.controller().velocity();
        assert!(v.vx.is_finite() && v.vx > 0.0);
        let m = env.provider().read_transform(GO2_DEFAULT_PATH).unwrap();
        assert!(transform::translation(&m).x > start[0]);
    }

    #[test]
    fn test_spawn_pose_applied() {
        let mut cfg = short_task(1);
        cfg.spawn.x = 2.0;
        cfg.spawn.yaw = 0.5;
        let env = Go2Env::placeholder(&cfg);
        let m = env.provider().read_transform(&cfg.body_path).unwrap();
        assert_relative_eq!(transform::translation(&m).x, 2.0);
        assert_relative_eq!(transform::yaw(&m), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_close_returns_provider() {
        let mut env = Go2Env::placeholder(&short_task(2));
        env.reset();
        env.step((1.0, 0.0, 0.0)).unwrap();
        let stage = env.close();
        assert_eq!(stage.len(), 1);
    }
}
