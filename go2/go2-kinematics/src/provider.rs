use thiserror::Error;

use crate::transform::Transform;

/// Scene path of a tracked body, e.g. `/World/Go2`.
pub type BodyId = str;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoseError {
    /// The provider has no entry for the body.
    #[error("body not found: {0}")]
    BodyNotFound(String),

    /// Refused to store a transform containing NaN or infinite entries.
    #[error("non-finite transform for body {body}")]
    NonFinite { body: String },
}

/// Capability to read and write the pose of tracked bodies.
///
/// Absence is a value, not a failure: `read_transform` returns `None` and
/// `write_transform` returns [`PoseError::BodyNotFound`], so callers decide
/// whether a missing body is a no-op or an error.
pub trait PoseProvider {
    fn read_transform(&self, body: &BodyId) -> Option<Transform>;

    fn write_transform(&mut self, body: &BodyId, transform: Transform) -> Result<(), PoseError>;

    fn contains(&self, body: &BodyId) -> bool {
        self.read_transform(body).is_some()
    }

    /// Current transform, or identity when the body is absent.
    fn read_or_identity(&self, body: &BodyId) -> Transform {
        self.read_transform(body).unwrap_or_else(Transform::identity)
    }
}
