//! Camera-relative movement mapping
//!
//! Turns a 2D input axis into a horizontal world-space direction. With a
//! camera, `y` follows the camera's flattened forward and `x` its right
//! vector; without one the world axes are used.

use glam::{Vec2, Vec3};

use crate::ecs::Transform;

/// Direction the ball moves for positive `y` input when there is no camera
pub const WORLD_FORWARD: Vec3 = Vec3::NEG_Z;

/// Direction the ball moves for positive `x` input when there is no camera
pub const WORLD_RIGHT: Vec3 = Vec3::X;

/// Vectors shorter than this normalize to zero
const MIN_NORMALIZE_LENGTH: f32 = 1e-5;

/// Normalize `v`, or return zero when it is too short to carry a direction.
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > MIN_NORMALIZE_LENGTH {
        v / length
    } else {
        Vec3::ZERO
    }
}

/// Project a vector onto the horizontal plane and normalize it.
///
/// Returns zero when the vector is (nearly) vertical.
pub fn flatten(v: Vec3) -> Vec3 {
    normalize_or_zero(v * Vec3::new(1.0, 0.0, 1.0))
}

/// Map an input axis to a world-space movement direction.
///
/// The result is unit length, or zero for zero input.
pub fn camera_relative_direction(axis: Vec2, camera: Option<&Transform>) -> Vec3 {
    match camera {
        Some(camera) => {
            let forward = flatten(camera.forward());
            normalize_or_zero(axis.y * forward + axis.x * camera.right())
        }
        None => world_relative_direction(axis),
    }
}

/// Map an input axis onto the world axes.
pub fn world_relative_direction(axis: Vec2) -> Vec3 {
    normalize_or_zero(axis.y * WORLD_FORWARD + axis.x * WORLD_RIGHT)
}
