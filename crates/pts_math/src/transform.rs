// Transform utilities for point import
//
// Builds the affine placement matrix from editor-style position/rotation/scale
// and applies it to record positions.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Convert Euler angles in degrees to a rotation.
///
/// Rotation order is Z first, then X, then Y (the convention used by most
/// asset pipelines for `(pitch, yaw, roll)` style inspector fields).
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Compose a translate/rotate/scale matrix.
///
/// Order: Scale -> Rotate -> Translate (SRT)
pub fn trs(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, euler_degrees_to_quat(rotation_degrees), position)
}

/// Transform a position as a point (implicit w=1).
///
/// Only the upper 3x4 block is used; the projective row is ignored. Degenerate
/// matrices (zero scale) collapse points instead of failing.
#[inline]
pub fn apply(transform: &Mat4, position: Vec3) -> Vec3 {
    transform.transform_point3(position)
}
