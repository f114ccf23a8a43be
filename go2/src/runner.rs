//! Short rollouts for previewing a task without a training framework.

use go2_kinematics::PoseProvider;
use serde::{Deserialize, Serialize};

use crate::env::Go2Env;
use crate::error::EnvError;
use crate::managers::RewardBreakdown;
use crate::ml::{Observation, Policy};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RolloutSummary {
    pub steps: u64,
    pub total_return: f32,
    /// Whether the episode reached `steps_per_episode` (vs. hitting `max_steps`)
    pub finished: bool,
    pub final_observation: Observation,
    /// Per-step mean of each reward term
    pub mean_breakdown: RewardBreakdown,
}

/// Reset `env` and run `policy` until the episode is done or `max_steps` is hit.
pub fn rollout<P, Pol>(
    env: &mut Go2Env<P>,
    policy: &mut Pol,
    max_steps: u64,
) -> Result<RolloutSummary, EnvError>
where
    P: PoseProvider,
    Pol: Policy + ?Sized,
{
    let mut obs = env.reset();
    let mut total_return = 0.0;
    let mut sum = RewardBreakdown::default();
    let mut steps = 0;
    let mut finished = false;

    while steps < max_steps {
        let action = policy.act(&obs);
        let result = env.step(action)?;
        total_return += result.reward;
        sum.accumulate(&result.breakdown);
        obs = result.observation;
        steps += 1;
        if result.done {
            finished = true;
            break;
        }
    }

    let mean_breakdown = if steps > 0 {
        sum.scaled(1.0 / steps as f32)
    } else {
        sum
    };

    log::info!("Rollout finished: steps={}, return={:.3}", steps, total_return);

    Ok(RolloutSummary {
        steps,
        total_return,
        finished,
        final_observation: obs,
        mean_breakdown,
    })
}
