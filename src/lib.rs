//! A rolling-ball player controller on a small Rust engine
//!
//! This crate provides:
//! - Camera-relative mapping of a 2D move axis to a world direction
//! - Torque/force locomotion and grounded jumps on a rapier3d rigid body
//! - A fixed-timestep winit loop and hecs world to drive it

pub mod camera;
pub mod core;
pub mod ecs;
pub mod input;
pub mod physics;
pub mod player;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::camera::OrbitCamera;
    pub use crate::core::{
        BallConfig, ConfigError, ControllerConfig, Engine, EngineConfig, EngineContext,
        FixedTimestep, Game,
    };
    pub use crate::ecs::{MainCamera, Name, PhysicsBody, Player, Transform, World};
    pub use crate::input::{Input, InputAction, InputMapper};
    pub use crate::physics::{ColliderHandle, Physics, RigidBodyHandle};
    pub use crate::player::BallController;
    pub use glam::{Quat, Vec2, Vec3};
    pub use winit::event::ElementState;
    pub use winit::keyboard::KeyCode;
}
