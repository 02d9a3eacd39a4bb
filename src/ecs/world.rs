//! World wrapper around hecs

use hecs::Entity;

use crate::ecs::{MainCamera, PhysicsBody, Transform};
use crate::physics::Physics;

/// Game world containing all entities and components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Query for entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut::<Q>()
    }

    /// Find the main camera entity, if the scene has one
    pub fn main_camera(&self) -> Option<Entity> {
        self.inner
            .query::<(&MainCamera, &Transform)>()
            .iter()
            .map(|(entity, _)| entity)
            .next()
    }

    /// Copy rigid body poses back into entity transforms
    pub fn sync_from_physics(&mut self, physics: &Physics) {
        for (_, (transform, body)) in self.inner.query_mut::<(&mut Transform, &PhysicsBody)>() {
            if let (Some(position), Some(rotation)) =
                (physics.get_position(body.0), physics.get_rotation(body.0))
            {
                transform.position = position;
                transform.rotation = rotation;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_main_camera_lookup() {
        let mut world = World::new();
        assert!(world.main_camera().is_none());

        // A tag without a transform is not a usable camera
        world.spawn((MainCamera,));
        assert!(world.main_camera().is_none());

        let camera = world.spawn((MainCamera, Transform::default()));
        assert_eq!(world.main_camera(), Some(camera));
    }

    #[test]
    fn test_sync_from_physics() {
        let mut physics = Physics::with_gravity(Vec3::ZERO);
        let body = physics.create_dynamic_body(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);

        let mut world = World::new();
        let entity = world.spawn((Transform::default(), PhysicsBody(body)));
        world.sync_from_physics(&physics);

        let transform = world.get::<Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
