//! The physics primitives a rope needs.
//!
//! Ropes never look inside the solver. They create bodies, wire joints,
//! tag collision groups, push forces and ask for poses, all through
//! [`PhysicsBackend`]. [`sim_planar::World`] implements it; any other 2-D
//! engine can be plugged in the same way.

use nalgebra::{Point2, Vector2};
use sim_planar::World;
use sim_planar_types::{BodyId, JointDef, JointId, Material, Pose2, Shape};

/// Rigid-body engine operations used by rope construction and stepping.
///
/// Implement this trait for your world type to host ropes in it.
pub trait PhysicsBackend {
    /// Add a dynamic body.
    fn add_dynamic_body(
        &mut self,
        shape: Shape,
        material: Material,
        pose: Pose2,
    ) -> sim_planar_types::Result<BodyId>;

    /// Remove a body and every joint attached to it.
    ///
    /// Returns `false` if the body did not exist.
    fn remove_body(&mut self, id: BodyId) -> bool;

    /// Whether the body exists.
    fn contains_body(&self, id: BodyId) -> bool;

    /// Current pose of a body.
    fn pose(&self, id: BodyId) -> Option<Pose2>;

    /// Teleport a body, keeping its orientation.
    fn set_position(&mut self, id: BodyId, position: Point2<f64>) -> sim_planar_types::Result<()>;

    /// Put a body into a non-colliding group (`0` clears the group).
    fn set_collision_group(&mut self, id: BodyId, group: u64) -> sim_planar_types::Result<()>;

    /// Current collision group of a body (`0` when ungrouped).
    fn collision_group(&self, id: BodyId) -> Option<u64>;

    /// Add a joint.
    fn add_joint(&mut self, def: JointDef) -> sim_planar_types::Result<JointId>;

    /// Remove a joint. Returns `false` if it did not exist.
    fn remove_joint(&mut self, id: JointId) -> bool;

    /// Distance between a joint's anchors beyond its rest length.
    fn joint_violation(&self, id: JointId) -> sim_planar_types::Result<f64>;

    /// Accumulate a force at a body's center for the next step.
    fn apply_force(&mut self, id: BodyId, force: Vector2<f64>) -> sim_planar_types::Result<()>;

    /// Accumulate a torque on a body for the next step.
    fn apply_torque(&mut self, id: BodyId, torque: f64) -> sim_planar_types::Result<()>;

    /// Fixed timestep of one frame.
    fn timestep(&self) -> f64;

    /// Advance every body by `dt`.
    fn step(&mut self, dt: f64) -> sim_planar_types::Result<()>;

    /// Pin joint between two anchors that holds them at their current distance.
    ///
    /// Only the definition is built; pass it to [`Self::add_joint`].
    fn pin_at_rest(
        &self,
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Point2<f64>,
        anchor_b: Point2<f64>,
    ) -> sim_planar_types::Result<JointDef> {
        let world_a = self.world_point(body_a, &anchor_a)?;
        let world_b = self.world_point(body_b, &anchor_b)?;
        let rest_length = (world_b - world_a).norm();
        Ok(JointDef::pin(body_a, body_b, anchor_a, anchor_b, rest_length))
    }

    /// World position of a point given in a body's local frame.
    fn world_point(&self, id: BodyId, local: &Point2<f64>) -> sim_planar_types::Result<Point2<f64>> {
        self.pose(id)
            .map(|pose| pose.transform_point(local))
            .ok_or(sim_planar_types::SimError::UnknownBody(id))
    }
}

impl PhysicsBackend for World {
    fn add_dynamic_body(
        &mut self,
        shape: Shape,
        material: Material,
        pose: Pose2,
    ) -> sim_planar_types::Result<BodyId> {
        Self::add_dynamic_body(self, shape, material, pose)
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        Self::remove_body(self, id).is_some()
    }

    fn contains_body(&self, id: BodyId) -> bool {
        Self::contains_body(self, id)
    }

    fn pose(&self, id: BodyId) -> Option<Pose2> {
        self.body(id).map(|body| body.pose)
    }

    fn set_position(&mut self, id: BodyId, position: Point2<f64>) -> sim_planar_types::Result<()> {
        Self::set_position(self, id, position)
    }

    fn set_collision_group(&mut self, id: BodyId, group: u64) -> sim_planar_types::Result<()> {
        Self::set_collision_group(self, id, group)
    }

    fn collision_group(&self, id: BodyId) -> Option<u64> {
        self.body(id).map(|body| body.filter.group)
    }

    fn add_joint(&mut self, def: JointDef) -> sim_planar_types::Result<JointId> {
        Self::add_joint(self, def)
    }

    fn remove_joint(&mut self, id: JointId) -> bool {
        Self::remove_joint(self, id).is_some()
    }

    fn joint_violation(&self, id: JointId) -> sim_planar_types::Result<f64> {
        Self::joint_violation(self, id)
    }

    fn apply_force(&mut self, id: BodyId, force: Vector2<f64>) -> sim_planar_types::Result<()> {
        Self::apply_force(self, id, force)
    }

    fn apply_torque(&mut self, id: BodyId, torque: f64) -> sim_planar_types::Result<()> {
        Self::apply_torque(self, id, torque)
    }

    fn timestep(&self) -> f64 {
        Self::timestep(self)
    }

    fn step(&mut self, dt: f64) -> sim_planar_types::Result<()> {
        Self::step(self, dt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_planar_types::{JointKind, SimulationConfig};

    fn rod() -> Shape {
        Shape::Rect {
            width: 1.0,
            height: 0.02,
        }
    }

    #[test]
    fn test_world_as_backend() {
        let mut world = World::new(SimulationConfig::default());
        let backend: &mut dyn PhysicsBackend = &mut world;

        let a = backend
            .add_dynamic_body(rod(), Material::default(), Pose2::identity())
            .unwrap();
        assert!(backend.contains_body(a));
        backend.set_position(a, Point2::new(2.0, 1.0)).unwrap();
        assert_relative_eq!(backend.pose(a).unwrap().position.x, 2.0);
        assert_eq!(backend.collision_group(a), Some(0));
        backend.set_collision_group(a, 4).unwrap();
        assert_eq!(backend.collision_group(a), Some(4));

        let p = backend
            .world_point(a, &Point2::new(0.5, 0.0))
            .unwrap();
        assert_relative_eq!(p.x, 2.5);
        assert_relative_eq!(p.y, 1.0);

        assert!(backend.remove_body(a));
        assert!(!backend.remove_body(a));
        assert!(backend.pose(a).is_none());
        assert!(backend.collision_group(a).is_none());
    }

    #[test]
    fn test_pin_rest_length_from_current_pose() {
        let mut world = World::new(SimulationConfig::default());
        let a = world
            .add_dynamic_body(rod(), Material::default(), Pose2::identity())
            .unwrap();
        let b = world
            .add_dynamic_body(
                rod(),
                Material::default(),
                Pose2::from_position(Point2::new(0.0, 3.0)),
            )
            .unwrap();

        let def = world
            .pin_at_rest(a, b, Point2::origin(), Point2::new(0.5, 0.0))
            .unwrap();
        assert_eq!(def.body_a, a);
        assert_eq!(def.body_b, b);
        let JointKind::Pin { rest_length } = def.kind else {
            panic!("expected a pin, got {:?}", def.kind);
        };
        assert_relative_eq!(rest_length, 3.25f64.sqrt());

        let pin = world.add_joint(def).unwrap();
        assert_relative_eq!(PhysicsBackend::joint_violation(&world, pin).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_body_world_point() {
        let world = World::new(SimulationConfig::default());
        assert!(world
            .world_point(BodyId(9), &Point2::origin())
            .is_err());
        assert!(world
            .pin_at_rest(BodyId(9), BodyId(10), Point2::origin(), Point2::origin())
            .is_err());
    }
}
