use serde::{Deserialize, Serialize};

use super::action::AppliedAction;
use crate::ml::{Action, Observation};

pub struct RewardWeights;

impl RewardWeights {
    pub const SURVIVE: f32 = 0.01;
    pub const FORWARD: f32 = 0.05;
    pub const SMOOTH: f32 = 0.002;
    pub const LAT_PEN: f32 = 0.02;
    pub const UPRIGHT: f32 = 0.02;
}

/// Named reward terms for one step; `reward` is their sum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub survive_bonus: f32,
    pub forward_progress: f32,
    pub smoothness: f32,
    pub lateral_pen: f32,
    pub upright: f32,
    pub reward: f32,
}

impl RewardBreakdown {
    pub const TERMS: [&'static str; 5] = [
        "survive_bonus",
        "forward_progress",
        "smoothness",
        "lateral_pen",
        "upright",
    ];

    fn from_terms(
        survive_bonus: f32,
        forward_progress: f32,
        smoothness: f32,
        lateral_pen: f32,
        upright: f32,
    ) -> Self {
        Self {
            survive_bonus,
            forward_progress,
            smoothness,
            lateral_pen,
            upright,
            reward: survive_bonus + forward_progress + smoothness + lateral_pen + upright,
        }
    }

    /// The five terms in summation order, without the total
    pub fn terms(&self) -> [(&'static str, f32); 5] {
        [
            (Self::TERMS[0], self.survive_bonus),
            (Self::TERMS[1], self.forward_progress),
            (Self::TERMS[2], self.smoothness),
            (Self::TERMS[3], self.lateral_pen),
            (Self::TERMS[4], self.upright),
        ]
    }

    /// Term-wise accumulate (used for episode means)
    pub fn accumulate(&mut self, other: &RewardBreakdown) {
        self.survive_bonus += other.survive_bonus;
        self.forward_progress += other.forward_progress;
        self.smoothness += other.smoothness;
        self.lateral_pen += other.lateral_pen;
        self.upright += other.upright;
        self.reward += other.reward;
    }

    pub fn scaled(&self, k: f32) -> Self {
        Self {
            survive_bonus: self.survive_bonus * k,
            forward_progress: self.forward_progress * k,
            smoothness: self.smoothness * k,
            lateral_pen: self.lateral_pen * k,
            upright: self.upright * k,
            reward: self.reward * k,
        }
    }
}

/// Combines survival, forward progress, action smoothness, lateral drift and
/// uprightness into a scalar reward.
pub struct RewardManager {
    // Fallback history when no applied action is supplied (raw, pre-scale)
    prev_action: [f32; 3],
}

impl Default for RewardManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardManager {
    pub fn new() -> Self {
        Self {
            prev_action: [0.0; 3],
        }
    }

    pub fn reset(&mut self) {
        self.prev_action = [0.0; 3];
    }

    /// Score one step.
    ///
    /// With `applied` the smoothness delta is the scaled command minus the
    /// command from the step before; without it the raw action is compared to
    /// the raw action seen on the previous call.
    pub fn compute(
        &mut self,
        obs: &Observation,
        action: &Action,
        applied: Option<&AppliedAction>,
    ) -> RewardBreakdown {
        let raw = action.sanitized().to_array();
        let delta = match applied {
            Some(applied) => applied.delta(),
            None => [
                raw[0] - self.prev_action[0],
                raw[1] - self.prev_action[1],
                raw[2] - self.prev_action[2],
            ],
        };

        let survive_bonus = RewardWeights::SURVIVE;
        // Backward motion earns nothing rather than a penalty
        let forward_progress = RewardWeights::FORWARD * obs.base_lin_vel[0].max(0.0);
        let smoothness =
            -RewardWeights::SMOOTH * (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]);
        let lateral_pen = -RewardWeights::LAT_PEN * obs.base_lin_vel[1].abs();
        let upright = RewardWeights::UPRIGHT * obs.up_dot.max(0.0);

        self.prev_action = raw;
        RewardBreakdown::from_terms(survive_bonus, forward_progress, smoothness, lateral_pen, upright)
    }
}
