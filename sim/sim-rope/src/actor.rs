//! Externally driven bodies.
//!
//! An [`Actor`] holds the force and torque a scene wants on a body. The
//! values persist across frames: set them once and they are applied on
//! every physics step until changed or cleared.
//!
//! ```
//! use nalgebra::Vector2;
//! use sim_planar_types::BodyId;
//! use sim_rope::Actor;
//!
//! let mut clip = Actor::new(BodyId::new(4));
//! clip.set_force(Vector2::new(0.0, -2.0));
//! assert!(clip.is_active());
//! clip.clear();
//! assert!(!clip.is_active());
//! ```

use nalgebra::Vector2;
use sim_planar_types::BodyId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{PhysicsBackend, Result, RopeError};

/// Identifier of an actor within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActorId(pub usize);

/// A body with a current external force and torque.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Actor {
    body: BodyId,
    force: Vector2<f64>,
    torque: f64,
}

impl Actor {
    /// Actor on `body` with no force.
    #[must_use]
    pub fn new(body: BodyId) -> Self {
        Self {
            body,
            force: Vector2::zeros(),
            torque: 0.0,
        }
    }

    /// The driven body.
    #[must_use]
    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Current force.
    #[must_use]
    pub fn force(&self) -> Vector2<f64> {
        self.force
    }

    /// Current torque.
    #[must_use]
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Replace the current force.
    pub fn set_force(&mut self, force: Vector2<f64>) {
        self.force = force;
    }

    /// Replace the current torque.
    pub fn set_torque(&mut self, torque: f64) {
        self.torque = torque;
    }

    /// Zero force and torque.
    pub fn clear(&mut self) {
        self.force = Vector2::zeros();
        self.torque = 0.0;
    }

    /// Whether the actor pushes at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.force != Vector2::zeros() || self.torque != 0.0
    }

    /// Hand the current force and torque to `backend` for the next step.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::MissingBody`] if the body is gone.
    pub fn apply<B>(&self, backend: &mut B) -> Result<()>
    where
        B: PhysicsBackend + ?Sized,
    {
        if !backend.contains_body(self.body) {
            return Err(RopeError::missing_body(self.body));
        }
        if self.force != Vector2::zeros() {
            backend.apply_force(self.body, self.force)?;
        }
        if self.torque != 0.0 {
            backend.apply_torque(self.body, self.torque)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use sim_planar::World;
    use sim_planar_types::{Material, Pose2, Shape, SimulationConfig};

    #[test]
    fn test_force_persists_across_steps() {
        let mut world = World::new(SimulationConfig::default());
        let ball = world
            .add_dynamic_body(
                Shape::Circle { radius: 0.5 },
                Material::default(),
                Pose2::from_position(Point2::origin()),
            )
            .unwrap();
        let mut actor = Actor::new(ball);
        actor.set_force(Vector2::new(1.0, 0.0));

        let dt = world.timestep();
        for _ in 0..3 {
            actor.apply(&mut world).unwrap();
            world.step(dt).unwrap();
        }
        let v = world.body(ball).unwrap().velocity.linear;
        let mass = Shape::Circle { radius: 0.5 }.mass_properties(1.0).mass;
        assert_relative_eq!(v.x, 3.0 * dt / mass, epsilon = 1e-9);
        assert_relative_eq!(actor.force().x, 1.0);
    }

    #[test]
    fn test_torque_spins() {
        let mut world = World::new(SimulationConfig::default());
        let rod = world
            .add_dynamic_body(
                Shape::Rect {
                    width: 1.0,
                    height: 0.1,
                },
                Material::default(),
                Pose2::identity(),
            )
            .unwrap();
        let mut actor = Actor::new(rod);
        actor.set_torque(0.5);
        actor.apply(&mut world).unwrap();
        world.step(world.timestep()).unwrap();
        assert!(world.body(rod).unwrap().velocity.angular > 0.0);
    }

    #[test]
    fn test_missing_body() {
        let mut world = World::new(SimulationConfig::default());
        let actor = Actor::new(BodyId(3));
        assert!(matches!(
            actor.apply(&mut world),
            Err(RopeError::MissingBody { .. })
        ));
    }
}
