//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod world;

pub use components::{MainCamera, Name, PhysicsBody, Player, Transform};
pub use world::World;
