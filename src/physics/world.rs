//! Physics simulation using rapier3d

use glam::{Quat, Vec3};
use rapier3d::na::{self, UnitQuaternion};
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
fn rapier_to_quat(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        na::Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Per-body angular speed limits (rad/s), enforced after every step
    angular_limits: FxHashMap<RigidBodyHandle, f32>,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            angular_limits: FxHashMap::default(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        self.enforce_angular_limits();
    }

    fn enforce_angular_limits(&mut self) {
        for (body, &max) in &self.angular_limits {
            let Some(rb) = self.rigid_body_set.get_mut(body.0) else {
                continue;
            };
            let angvel = *rb.angvel();
            let speed = angvel.norm();
            if speed > max {
                rb.set_angvel(angvel * (max / speed), true);
            }
        }
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a dynamic rigid body (affected by forces)
    pub fn create_dynamic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a sphere collider with a fixed total mass to a rigid body
    pub fn add_sphere_collider(
        &mut self,
        body: RigidBodyHandle,
        radius: f32,
        mass: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius).mass(mass).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a ground plane collider
    pub fn add_ground_plane(&mut self, body: RigidBodyHandle) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(100.0, 0.1, 100.0).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Get the rotation of a rigid body
    pub fn get_rotation(&self, body: RigidBodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| rapier_to_quat(rb.rotation()))
    }

    /// Set how quickly a body's spin decays
    pub fn set_angular_damping(&mut self, body: RigidBodyHandle, damping: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_angular_damping(damping);
        }
    }

    /// Limit the angular speed of a body. The limit is applied after each step.
    pub fn set_max_angular_velocity(&mut self, body: RigidBodyHandle, max: f32) {
        self.angular_limits.insert(body, max.max(0.0));
    }

    /// Get the angular speed limit of a body, if any
    pub fn max_angular_velocity(&self, body: RigidBodyHandle) -> Option<f32> {
        self.angular_limits.get(&body).copied()
    }

    /// Apply a force to a dynamic body
    ///
    /// The force stays applied on every step until [`Physics::reset_forces`].
    /// A zero force leaves a sleeping body asleep.
    pub fn apply_force(&mut self, body: RigidBodyHandle, force: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.add_force(vector![force.x, force.y, force.z], force != Vec3::ZERO);
        }
    }

    /// Apply a torque to a dynamic body
    ///
    /// The torque stays applied on every step until [`Physics::reset_forces`].
    /// A zero torque leaves a sleeping body asleep.
    pub fn apply_torque(&mut self, body: RigidBodyHandle, torque: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.add_torque(vector![torque.x, torque.y, torque.z], torque != Vec3::ZERO);
        }
    }

    /// Whether the body is asleep (excluded from simulation until woken)
    pub fn is_sleeping(&self, body: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(body.0)
            .is_some_and(|rb| rb.is_sleeping())
    }

    /// Clear all user forces and torques on a body
    pub fn reset_forces(&mut self, body: RigidBodyHandle) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    /// Get the user force currently applied to a body
    pub fn get_applied_force(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let f = rb.user_force();
            Vec3::new(f.x, f.y, f.z)
        })
    }

    /// Get the user torque currently applied to a body
    pub fn get_applied_torque(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let t = rb.user_torque();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Apply an impulse to a dynamic body
    pub fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        }
    }

    /// Get the linear velocity of a body
    pub fn get_linear_velocity(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let vel = rb.linvel();
            Vec3::new(vel.x, vel.y, vel.z)
        })
    }

    /// Set the angular velocity of a body
    pub fn set_angular_velocity(&mut self, body: RigidBodyHandle, velocity: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_angvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Get the angular velocity of a body
    pub fn get_angular_velocity(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let vel = rb.angvel();
            Vec3::new(vel.x, vel.y, vel.z)
        })
    }

    /// Cast a ray and return the first hit
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.cast_ray_filtered(origin, direction, max_distance, QueryFilter::default())
    }

    /// Cast a ray that ignores every collider attached to `body`
    pub fn raycast_excluding(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        body: RigidBodyHandle,
    ) -> Option<RaycastHit> {
        self.cast_ray_filtered(
            origin,
            direction,
            max_distance,
            QueryFilter::default().exclude_rigid_body(body.0),
        )
    }

    fn cast_ray_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Remove a rigid body and its colliders
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.angular_limits.remove(&body);
        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 50.0;

    fn world_with_ground() -> Physics {
        let mut physics = Physics::new();
        let ground = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        physics.add_ground_plane(ground);
        physics
    }

    fn spawn_ball(physics: &mut Physics, position: Vec3) -> RigidBodyHandle {
        let body = physics.create_dynamic_body(position, Quat::IDENTITY);
        physics.add_sphere_collider(body, 0.5, 1.0);
        body
    }

    #[test]
    fn test_raycast_hits_ground() {
        let mut physics = world_with_ground();
        physics.step(DT);

        let hit = physics.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 2.0);
        let hit = hit.expect("ray should hit the ground plane");
        assert!((hit.distance - 0.9).abs() < 0.01);
        assert!((hit.point.y - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut physics = world_with_ground();
        physics.step(DT);

        assert!(
            physics
                .raycast(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 1.0)
                .is_none()
        );
    }

    #[test]
    fn test_raycast_excluding_skips_own_collider() {
        let mut physics = Physics::new();
        let ball = spawn_ball(&mut physics, Vec3::new(0.0, 5.0, 0.0));
        physics.step(DT);

        let origin = physics.get_position(ball).unwrap();
        assert!(physics.raycast(origin, Vec3::NEG_Y, 1.0).is_some());
        assert!(
            physics
                .raycast_excluding(origin, Vec3::NEG_Y, 1.0, ball)
                .is_none()
        );
    }

    #[test]
    fn test_forces_persist_until_reset() {
        let mut physics = Physics::new();
        let ball = spawn_ball(&mut physics, Vec3::ZERO);

        physics.apply_force(ball, Vec3::X);
        physics.apply_torque(ball, Vec3::Z);
        physics.step(DT);
        assert!((physics.get_applied_force(ball).unwrap() - Vec3::X).length() < 1e-5);
        assert!((physics.get_applied_torque(ball).unwrap() - Vec3::Z).length() < 1e-5);

        physics.reset_forces(ball);
        assert_eq!(physics.get_applied_force(ball), Some(Vec3::ZERO));
        assert_eq!(physics.get_applied_torque(ball), Some(Vec3::ZERO));
    }

    #[test]
    fn test_zero_force_does_not_wake_body() {
        let mut physics = world_with_ground();
        let ball = spawn_ball(&mut physics, Vec3::new(0.0, 0.6, 0.0));

        for _ in 0..500 {
            if physics.is_sleeping(ball) {
                break;
            }
            physics.step(DT);
        }
        assert!(physics.is_sleeping(ball), "resting ball never fell asleep");

        physics.reset_forces(ball);
        physics.apply_force(ball, Vec3::ZERO);
        physics.apply_torque(ball, Vec3::ZERO);
        physics.step(DT);
        assert!(physics.is_sleeping(ball));

        physics.apply_torque(ball, Vec3::X);
        assert!(!physics.is_sleeping(ball));
    }

    #[test]
    fn test_angular_velocity_is_clamped() {
        let mut physics = Physics::with_gravity(Vec3::ZERO);
        let ball = spawn_ball(&mut physics, Vec3::ZERO);
        physics.set_max_angular_velocity(ball, 25.0);

        physics.set_angular_velocity(ball, Vec3::new(100.0, 0.0, 0.0));
        physics.step(DT);

        let speed = physics.get_angular_velocity(ball).unwrap().length();
        assert!(speed <= 25.0 + 1e-3, "angular speed {speed} exceeds limit");
        assert!(speed > 20.0);
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let mut physics = Physics::with_gravity(Vec3::ZERO);
        let ball = spawn_ball(&mut physics, Vec3::ZERO);
        physics.step(DT);

        physics.apply_impulse(ball, Vec3::Y * 2.0);

        // Mass is 1, so the velocity change equals the impulse
        let vel = physics.get_linear_velocity(ball).unwrap();
        assert!((vel.y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_remove_body_drops_limit() {
        let mut physics = Physics::new();
        let ball = spawn_ball(&mut physics, Vec3::ZERO);
        physics.set_max_angular_velocity(ball, 10.0);
        physics.remove_body(ball);

        assert!(physics.get_position(ball).is_none());
        assert!(physics.max_angular_velocity(ball).is_none());
    }
}
