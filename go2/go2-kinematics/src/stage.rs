use std::collections::HashMap;

use nalgebra as na;

use crate::provider::{BodyId, PoseError, PoseProvider};
use crate::transform::{self, Transform};

/// Where the GO2 base lives in the scene graph.
pub const GO2_DEFAULT_PATH: &str = "/World/Go2";

/// Height of a freshly spawned placeholder body.
const PLACEHOLDER_HEIGHT: f32 = 0.4;

/// In-memory scene: named bodies and their world transforms.
///
/// Stands in for a simulator stage. Nothing here moves on its own; the base
/// controller is the only writer while an episode runs.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    bodies: HashMap<String, Transform>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a body at the given transform.
    pub fn define(&mut self, body: &BodyId, transform: Transform) {
        self.bodies.insert(body.to_string(), transform);
    }

    pub fn remove(&mut self, body: &BodyId) -> Option<Transform> {
        self.bodies.remove(body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl PoseProvider for Stage {
    fn read_transform(&self, body: &BodyId) -> Option<Transform> {
        self.bodies.get(body).copied()
    }

    fn write_transform(&mut self, body: &BodyId, transform: Transform) -> Result<(), PoseError> {
        if !transform::is_finite(&transform) {
            return Err(PoseError::NonFinite { body: body.to_string() });
        }
        match self.bodies.get_mut(body) {
            Some(slot) => {
                *slot = transform;
                Ok(())
            }
            None => Err(PoseError::BodyNotFound(body.to_string())),
        }
    }

    fn contains(&self, body: &BodyId) -> bool {
        self.bodies.contains_key(body)
    }
}

/// Spawn a placeholder base body (no asset available) and return its path.
pub fn spawn_placeholder(stage: &mut Stage, path: &BodyId) -> String {
    let pose = transform::from_yaw_translation(0.0, na::Vector3::new(0.0, 0.0, PLACEHOLDER_HEIGHT));
    stage.define(path, pose);
    log::debug!("Spawned placeholder body at {}", path);
    path.to_string()
}

/// Overwrite a body's pose with a yaw-about-Z rotation and a translation.
pub fn reset_pose<P: PoseProvider + ?Sized>(
    provider: &mut P,
    body: &BodyId,
    pos: [f32; 3],
    yaw: f32,
) -> Result<(), PoseError> {
    let pose = transform::from_yaw_translation(yaw, na::Vector3::from(pos));
    provider.write_transform(body, pose)
}
