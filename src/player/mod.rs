//! Player ball: spawning, input routing, and the fixed-tick update
//!
//! Every entity tagged [`Player`] carries a [`BallController`]. Input events
//! are forwarded to all of them; [`fixed_update`] runs each controller
//! against the main camera's current transform.

mod controller;
pub mod movement;

pub use controller::{BallController, rolling_torque};

use glam::{Quat, Vec2, Vec3};
use hecs::Entity;

use crate::core::BallConfig;
use crate::ecs::{Name, PhysicsBody, Player, Transform, World};
use crate::physics::Physics;

/// Spawn a player ball at `position`
pub fn spawn_ball(
    world: &mut World,
    physics: &mut Physics,
    position: Vec3,
    config: &BallConfig,
) -> Entity {
    let body = physics.create_dynamic_body(position, Quat::IDENTITY);
    physics.add_sphere_collider(body, config.radius, config.mass);
    physics.set_angular_damping(body, config.angular_damping);

    let controller = BallController::attach(physics, body, config.controller.clone());
    log::info!(
        "Spawned ball at {position} ({} mode, speed {})",
        if config.controller.use_torque {
            "torque"
        } else {
            "force"
        },
        config.controller.speed
    );

    world.spawn((
        Name::new("Ball"),
        Player,
        Transform::from_position(position),
        PhysicsBody(body),
        controller,
    ))
}

/// Find the camera used for camera-relative controls.
///
/// Logs a warning when there is none; controls then fall back to the world
/// axes.
pub fn find_main_camera(world: &World) -> Option<Entity> {
    let camera = world.main_camera();
    if camera.is_none() {
        log::warn!(
            "No main camera found. Tag a camera entity with MainCamera for camera-relative controls; using world-relative controls"
        );
    }
    camera
}

/// Forward a move-axis change to every player
pub fn apply_move_input(world: &mut World, axis: Vec2) {
    for (_, controller) in world.query_mut::<&mut BallController>() {
        controller.on_move(axis);
    }
}

/// Forward a jump press to every player
pub fn apply_jump_input(world: &mut World) {
    for (_, controller) in world.query_mut::<&mut BallController>() {
        controller.on_jump();
    }
}

/// Run one fixed tick for every player, before stepping physics
///
/// A `camera` entity that no longer exists (or lost its transform) is
/// treated as no camera.
pub fn fixed_update(world: &mut World, physics: &mut Physics, camera: Option<Entity>) {
    let camera_transform = camera.and_then(|entity| world.get::<Transform>(entity).ok().map(|t| *t));

    for (_, controller) in world.query_mut::<&mut BallController>() {
        controller.fixed_update(physics, camera_transform.as_ref());
    }
}
