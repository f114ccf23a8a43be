use nalgebra as na;

/// Homogeneous 4x4 transform, column-vector convention.
///
/// Rotation lives in the upper-left 3x3 block and translation in column 3,
/// so the body's forward axis is column 0 and its up axis is column 2.
pub type Transform = na::Matrix4<f32>;

/// Translation part of a transform
pub fn translation(m: &Transform) -> na::Vector3<f32> {
    na::Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Yaw of a z-up transform: `atan2(r10, r00)`.
///
/// Only meaningful when roll and pitch are zero, which is the only rotation
/// the base controller ever writes.
pub fn yaw(m: &Transform) -> f32 {
    m[(1, 0)].atan2(m[(0, 0)])
}

/// Third rotation column (the body's local up axis in world coordinates).
pub fn up_axis(m: &Transform) -> na::Vector3<f32> {
    na::Vector3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)])
}

/// Rotation of `yaw` radians about +Z followed by `translation`.
pub fn from_yaw_translation(yaw: f32, translation: na::Vector3<f32>) -> Transform {
    na::Isometry3::from_parts(
        na::Translation3::from(translation),
        na::UnitQuaternion::from_axis_angle(&na::Vector3::z_axis(), yaw),
    )
    .to_homogeneous()
}

pub fn is_finite(m: &Transform) -> bool {
    m.iter().all(|v| v.is_finite())
}
