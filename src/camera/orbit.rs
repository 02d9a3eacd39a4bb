//! Third-person orbit camera

use glam::{Vec2, Vec3};

use crate::ecs::Transform;

/// Camera that circles a target at a fixed distance
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Rotation around the Y axis in radians
    pub yaw: f32,
    /// Elevation above the horizon in radians
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
    /// Radians per pixel of mouse movement
    pub sensitivity: f32,
    /// Distance change per scroll line
    pub zoom_speed: f32,
    /// Closest allowed distance
    pub min_distance: f32,
    /// Farthest allowed distance
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Create an orbit camera behind the target (on the +Z side), looking toward -Z
    pub fn new(distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.4,
            distance,
            sensitivity: 0.005,
            zoom_speed: 0.5,
            min_distance: 2.0,
            max_distance: 30.0,
        }
    }

    /// Rotate with mouse delta and zoom with scroll delta
    pub fn handle_input(&mut self, mouse_delta: Vec2, scroll_delta: Vec2) {
        self.yaw -= mouse_delta.x * self.sensitivity;
        self.pitch += mouse_delta.y * self.sensitivity;

        // Stay off the poles so the flattened forward never degenerates
        let max_pitch = 85.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.distance =
            (self.distance - scroll_delta.y * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    /// Offset from the target to the camera
    pub fn offset(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.yaw.sin() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Camera transform looking at `target`
    pub fn transform(&self, target: Vec3) -> Transform {
        Transform::looking_at(target + self.offset(), target, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(8.0)
    }
}
