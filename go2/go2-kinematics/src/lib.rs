//! Pose backend for the GO2 base: homogeneous transforms, the pose-provider
//! capability and an in-memory stage implementing it.
//!
//! The app crate only ever talks to [`PoseProvider`]; swapping in another
//! backend means implementing that trait and nothing else.

pub mod provider;
pub mod stage;
pub mod transform;

pub use provider::{BodyId, PoseError, PoseProvider};
pub use stage::{reset_pose, spawn_placeholder, Stage, GO2_DEFAULT_PATH};
pub use transform::Transform;
