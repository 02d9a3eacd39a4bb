//! Rolling ball locomotion
//!
//! Input callbacks record the latest move axis and latch jump presses. Once
//! per fixed tick the controller turns them into torque (or force) and a
//! jump impulse on the ball's rigid body.

use glam::{Vec2, Vec3};

use crate::core::ControllerConfig;
use crate::ecs::Transform;
use crate::physics::{Physics, RigidBodyHandle};
use crate::player::movement::camera_relative_direction;

/// Torque axis that rolls a ball resting on the ground toward `direction`.
///
/// This is `Y × direction`: spinning about it carries the top of the ball
/// along `direction`, so friction rolls the ball that way.
pub fn rolling_torque(direction: Vec3) -> Vec3 {
    Vec3::new(direction.z, 0.0, -direction.x)
}

/// Drives a ball-shaped rigid body from player input
#[derive(Debug, Clone)]
pub struct BallController {
    config: ControllerConfig,
    body: RigidBodyHandle,
    /// Latest 2D input axis
    movement_axis: Vec2,
    /// World-space direction computed on the last tick
    move_direction: Vec3,
    /// Jump pressed since the last tick
    jump: bool,
}

impl BallController {
    /// Bind a controller to `body` and apply its angular speed limit
    pub fn attach(physics: &mut Physics, body: RigidBodyHandle, config: ControllerConfig) -> Self {
        physics.set_max_angular_velocity(body, config.max_angular_velocity);
        Self {
            config,
            body,
            movement_axis: Vec2::ZERO,
            move_direction: Vec3::ZERO,
            jump: false,
        }
    }

    /// The rigid body this controller drives
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Latest input axis
    pub fn movement_axis(&self) -> Vec2 {
        self.movement_axis
    }

    /// Direction applied on the most recent tick
    pub fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Whether a jump is waiting for the next tick
    pub fn jump_requested(&self) -> bool {
        self.jump
    }

    /// Input callback: the move axis changed
    pub fn on_move(&mut self, axis: Vec2) {
        self.movement_axis = axis;
    }

    /// Input callback: the jump button was pressed
    pub fn on_jump(&mut self) {
        self.jump = true;
    }

    /// Run one fixed simulation tick
    ///
    /// Must be called before the physics step it should affect.
    pub fn fixed_update(&mut self, physics: &mut Physics, camera: Option<&Transform>) {
        self.move_direction = camera_relative_direction(self.movement_axis, camera);

        // Rapier keeps user forces between steps; each tick replaces the last one
        physics.reset_forces(self.body);
        self.move_ball(physics, self.move_direction);
        self.jump(physics, self.jump);
        self.jump = false;
    }

    /// Push the ball toward `direction`, with torque or force per the config
    pub fn move_ball(&self, physics: &mut Physics, direction: Vec3) {
        if self.config.use_torque {
            physics.apply_torque(self.body, rolling_torque(direction) * self.config.speed);
        } else {
            physics.apply_force(self.body, direction * self.config.speed);
        }
    }

    /// Apply the jump impulse if `jump` is set and the ball is on the ground
    ///
    /// Returns whether the impulse was applied.
    pub fn jump(&self, physics: &mut Physics, jump: bool) -> bool {
        if !jump || !self.is_grounded(physics) {
            return false;
        }
        physics.apply_impulse(self.body, Vec3::Y * self.config.jump_power);
        log::debug!("Ball jumped with impulse {}", self.config.jump_power);
        true
    }

    /// Short downward raycast from the ball's center, ignoring the ball itself
    pub fn is_grounded(&self, physics: &Physics) -> bool {
        let Some(position) = physics.get_position(self.body) else {
            return false;
        };
        physics
            .raycast_excluding(
                position,
                Vec3::NEG_Y,
                self.config.ground_ray_length,
                self.body,
            )
            .is_some()
    }
}
