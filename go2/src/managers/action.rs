use serde::{Deserialize, Serialize};

use crate::controller::BaseController;
use crate::ml::Action;

/// Scales from a unit action to velocity commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSpec {
    pub scale_lin_xy: f32,
    pub scale_yaw: f32,
}

impl Default for ActionSpec {
    fn default() -> Self {
        Self {
            scale_lin_xy: 0.5,
            scale_yaw: 0.8,
        }
    }
}

/// Result of one `apply` call.
///
/// `previous` is the manager's `prev_action` as it stood before this call,
/// which is what the smoothness reward needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedAction {
    pub scaled: [f32; 3],
    pub previous: [f32; 3],
}

impl AppliedAction {
    pub fn delta(&self) -> [f32; 3] {
        [
            self.scaled[0] - self.previous[0],
            self.scaled[1] - self.previous[1],
            self.scaled[2] - self.previous[2],
        ]
    }
}

/// Clamps raw actions to [-1, 1], scales them and forwards them to the base controller.
pub struct ActionManager {
    spec: ActionSpec,
    prev_action: [f32; 3],
}

impl ActionManager {
    pub fn new(spec: ActionSpec) -> Self {
        Self {
            spec,
            prev_action: [0.0; 3],
        }
    }

    pub fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    /// Last scaled command sent to the controller
    pub fn prev_action(&self) -> [f32; 3] {
        self.prev_action
    }

    /// Clamp, scale and forward `action`. Non-finite components count as 0.
    pub fn apply(&mut self, action: &Action, controller: &mut BaseController) -> AppliedAction {
        if !action.is_finite() {
            log::debug!("apply: non-finite action {:?} read as 0 on those axes", action);
        }
        let action = action.sanitized();
        let ax = action.ax.clamp(-1.0, 1.0) * self.spec.scale_lin_xy;
        let ay = action.ay.clamp(-1.0, 1.0) * self.spec.scale_lin_xy;
        let ayaw = action.ayaw.clamp(-1.0, 1.0) * self.spec.scale_yaw;
        controller.set_cmd(ax, ay, ayaw);

        let applied = AppliedAction {
            scaled: [ax, ay, ayaw],
            previous: self.prev_action,
        };
        self.prev_action = applied.scaled;
        applied
    }

    pub fn reset(&mut self) {
        self.prev_action = [0.0; 3];
    }
}
