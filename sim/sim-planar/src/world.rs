//! Simulation world container and entity management.
//!
//! The [`World`] owns every body and joint. Bodies and joints live in dense
//! vectors in insertion order, with `hashbrown` maps from ID to slot, so the
//! solver visits them in a deterministic order.

use hashbrown::HashMap;
use nalgebra::{Point2, Vector2};
use sim_planar_types::{
    BodyId, BodyKind, CollisionFilter, JointDef, JointId, MassProperties2, Material, Pose2, Shape,
    SimError, SimulationConfig, Velocity2,
};
use tracing::debug;

use crate::solver;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid body in the plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,
    /// Dynamic or static.
    pub kind: BodyKind,
    /// Collision geometry.
    pub shape: Shape,
    /// Density, elasticity and friction.
    pub material: Material,
    /// Mass and inertia.
    pub mass_props: MassProperties2,
    /// Collision filter.
    pub filter: CollisionFilter,
    /// Current pose.
    pub pose: Pose2,
    /// Current velocity.
    pub velocity: Velocity2,
    /// Accumulated external force (cleared each step).
    pub accumulated_force: Vector2<f64>,
    /// Accumulated external torque (cleared each step).
    pub accumulated_torque: f64,
}

impl Body {
    /// Create a dynamic body with mass derived from its shape and density.
    #[must_use]
    pub fn dynamic(id: BodyId, shape: Shape, material: Material, pose: Pose2) -> Self {
        Self {
            id,
            kind: BodyKind::Dynamic,
            shape,
            material,
            mass_props: shape.mass_properties(material.density),
            filter: CollisionFilter::default(),
            pose,
            velocity: Velocity2::zero(),
            accumulated_force: Vector2::zeros(),
            accumulated_torque: 0.0,
        }
    }

    /// Create a static (immovable) body.
    #[must_use]
    pub fn new_static(id: BodyId, shape: Shape, material: Material, pose: Pose2) -> Self {
        Self {
            kind: BodyKind::Static,
            mass_props: MassProperties2::immovable(),
            ..Self::dynamic(id, shape, material, pose)
        }
    }

    /// Whether the body never moves.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static || self.mass_props.is_static()
    }

    /// Inverse mass (0 for static bodies).
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static() {
            0.0
        } else {
            self.mass_props.inverse_mass()
        }
    }

    /// Inverse inertia (0 for static bodies).
    #[must_use]
    pub fn inverse_inertia(&self) -> f64 {
        if self.is_static() {
            0.0
        } else {
            self.mass_props.inverse_inertia()
        }
    }

    /// Local point to world coordinates.
    #[must_use]
    pub fn world_point(&self, local: &Point2<f64>) -> Point2<f64> {
        self.pose.transform_point(local)
    }

    /// Apply a force at the center of mass.
    pub fn apply_force(&mut self, force: Vector2<f64>) {
        if !self.is_static() {
            self.accumulated_force += force;
        }
    }

    /// Apply a torque.
    pub fn apply_torque(&mut self, torque: f64) {
        if !self.is_static() {
            self.accumulated_torque += torque;
        }
    }

    /// Clear accumulated forces and torques.
    pub fn clear_forces(&mut self) {
        self.accumulated_force = Vector2::zeros();
        self.accumulated_torque = 0.0;
    }

    /// Check if the body state contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pose.is_finite() && self.velocity.is_finite()
    }
}

/// A joint stored in the world.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Unique identifier.
    pub id: JointId,
    /// Bodies, anchors and kind.
    pub def: JointDef,
}

/// Planar simulation world.
///
/// # Example
///
/// ```
/// use sim_planar::World;
/// use sim_planar_types::{JointDef, Material, Pose2, Shape, SimulationConfig};
/// use nalgebra::Point2;
///
/// let mut world = World::new(SimulationConfig::default().with_gravity(9.81));
/// let nail = world
///     .add_static_body(Shape::Circle { radius: 0.05 }, Pose2::identity())
///     .unwrap();
/// let bob = world
///     .add_dynamic_body(
///         Shape::Circle { radius: 0.1 },
///         Material::default(),
///         Pose2::from_position(Point2::new(1.0, 0.0)),
///     )
///     .unwrap();
/// world
///     .add_joint(JointDef::pin(nail, bob, Point2::origin(), Point2::origin(), 1.0))
///     .unwrap();
///
/// for _ in 0..60 {
///     world.step(1.0 / 60.0).unwrap();
/// }
/// let p = world.body(bob).unwrap().pose.position;
/// assert!((p.coords.norm() - 1.0).abs() < 1e-2);
/// ```
#[derive(Debug, Clone)]
pub struct World {
    config: SimulationConfig,
    time: f64,
    step_count: u64,
    bodies: Vec<Body>,
    body_index: HashMap<BodyId, usize>,
    joints: Vec<Joint>,
    joint_index: HashMap<JointId, usize>,
    next_body_id: u64,
    next_joint_id: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl World {
    /// Create a new empty world with the given configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            time: 0.0,
            step_count: 0,
            bodies: Vec::new(),
            body_index: HashMap::new(),
            joints: Vec::new(),
            joint_index: HashMap::new(),
            next_body_id: 1,
            next_joint_id: 1,
        }
    }

    /// Get the simulation configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the current simulation time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Get the step count.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Get the timestep from configuration.
    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }

    /// Get the number of bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get the number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    // =========================================================================
    // Body Management
    // =========================================================================

    /// Add a body and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid shapes or materials.
    pub fn add_body(
        &mut self,
        kind: BodyKind,
        shape: Shape,
        material: Material,
        pose: Pose2,
    ) -> sim_planar_types::Result<BodyId> {
        shape.validate()?;
        material.validate()?;
        if !pose.is_finite() {
            return Err(SimError::invalid_config("body pose must be finite"));
        }

        let id = BodyId::new(self.next_body_id);
        self.next_body_id += 1;

        let body = match kind {
            BodyKind::Dynamic => Body::dynamic(id, shape, material, pose),
            BodyKind::Static => Body::new_static(id, shape, material, pose),
        };
        self.body_index.insert(id, self.bodies.len());
        self.bodies.push(body);
        debug!(body = id.raw(), ?kind, "added body");
        Ok(id)
    }

    /// Add a dynamic body.
    ///
    /// # Errors
    ///
    /// See [`Self::add_body`].
    pub fn add_dynamic_body(
        &mut self,
        shape: Shape,
        material: Material,
        pose: Pose2,
    ) -> sim_planar_types::Result<BodyId> {
        self.add_body(BodyKind::Dynamic, shape, material, pose)
    }

    /// Add a static body with the default material.
    ///
    /// # Errors
    ///
    /// See [`Self::add_body`].
    pub fn add_static_body(&mut self, shape: Shape, pose: Pose2) -> sim_planar_types::Result<BodyId> {
        self.add_body(BodyKind::Static, shape, Material::default(), pose)
    }

    /// Whether a body with this ID exists.
    #[must_use]
    pub fn contains_body(&self, id: BodyId) -> bool {
        self.body_index.contains_key(&id)
    }

    /// Get a body by ID.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.body_index.get(&id).map(|&slot| &self.bodies[slot])
    }

    /// Get a mutable reference to a body by ID.
    #[must_use]
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.body_index
            .get(&id)
            .copied()
            .map(move |slot| &mut self.bodies[slot])
    }

    fn body_or_err(&mut self, id: BodyId) -> sim_planar_types::Result<&mut Body> {
        self.body_mut(id).ok_or(SimError::UnknownBody(id))
    }

    /// Remove a body and every joint attached to it.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.body_index.remove(&id)?;
        let body = self.bodies.remove(slot);
        for (i, b) in self.bodies.iter().enumerate().skip(slot) {
            self.body_index.insert(b.id, i);
        }

        let attached: Vec<JointId> = self
            .joints
            .iter()
            .filter(|j| j.def.involves(id))
            .map(|j| j.id)
            .collect();
        for joint in &attached {
            self.remove_joint(*joint);
        }
        debug!(body = id.raw(), joints = attached.len(), "removed body");
        Some(body)
    }

    /// Iterate over all bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Iterate over all body IDs in insertion order.
    pub fn body_ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().map(|b| b.id)
    }

    /// Teleport a body, keeping its velocity.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn set_pose(&mut self, id: BodyId, pose: Pose2) -> sim_planar_types::Result<()> {
        if !pose.is_finite() {
            return Err(SimError::invalid_config("body pose must be finite"));
        }
        self.body_or_err(id)?.pose = pose;
        Ok(())
    }

    /// Move a body to `position`, keeping its angle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn set_position(&mut self, id: BodyId, position: Point2<f64>) -> sim_planar_types::Result<()> {
        let angle = self.body_or_err(id)?.pose.angle;
        self.set_pose(id, Pose2::new(position, angle))
    }

    /// Set a body's velocity.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Velocity2) -> sim_planar_types::Result<()> {
        let body = self.body_or_err(id)?;
        if !body.is_static() {
            body.velocity = velocity;
        }
        Ok(())
    }

    /// Replace a body's collision filter.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn set_collision_filter(
        &mut self,
        id: BodyId,
        filter: CollisionFilter,
    ) -> sim_planar_types::Result<()> {
        self.body_or_err(id)?.filter = filter;
        Ok(())
    }

    /// Put a body in a non-colliding group, keeping its category bits.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn set_collision_group(&mut self, id: BodyId, group: u64) -> sim_planar_types::Result<()> {
        let body = self.body_or_err(id)?;
        body.filter = body.filter.with_group(group);
        Ok(())
    }

    // =========================================================================
    // Joint Management
    // =========================================================================

    /// Add a joint between two existing bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if either body does not exist, both anchors are on
    /// the same body, or the definition is not finite.
    pub fn add_joint(&mut self, def: JointDef) -> sim_planar_types::Result<JointId> {
        for body in [def.body_a, def.body_b] {
            if !self.contains_body(body) {
                return Err(SimError::UnknownBody(body));
            }
        }
        if def.body_a == def.body_b {
            return Err(SimError::invalid_config(format!(
                "joint connects {} to itself",
                def.body_a
            )));
        }
        let finite = [def.anchor_a, def.anchor_b]
            .iter()
            .all(|a| a.x.is_finite() && a.y.is_finite());
        if !finite {
            return Err(SimError::invalid_config("joint anchors must be finite"));
        }

        let id = JointId::new(self.next_joint_id);
        self.next_joint_id += 1;
        self.joint_index.insert(id, self.joints.len());
        self.joints.push(Joint { id, def });
        Ok(id)
    }

    /// Get a joint by ID.
    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joint_index.get(&id).map(|&slot| &self.joints[slot])
    }

    /// Remove a joint.
    pub fn remove_joint(&mut self, id: JointId) -> Option<Joint> {
        let slot = self.joint_index.remove(&id)?;
        let joint = self.joints.remove(slot);
        for (i, j) in self.joints.iter().enumerate().skip(slot) {
            self.joint_index.insert(j.id, i);
        }
        Some(joint)
    }

    /// Iterate over all joints in insertion order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    /// World-space anchor points of a joint.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownJoint`] for unknown joints.
    pub fn joint_anchors(&self, id: JointId) -> sim_planar_types::Result<(Point2<f64>, Point2<f64>)> {
        let joint = self.joint(id).ok_or(SimError::UnknownJoint(id))?;
        let a = self
            .body(joint.def.body_a)
            .ok_or(SimError::UnknownBody(joint.def.body_a))?;
        let b = self
            .body(joint.def.body_b)
            .ok_or(SimError::UnknownBody(joint.def.body_b))?;
        Ok((a.world_point(&joint.def.anchor_a), b.world_point(&joint.def.anchor_b)))
    }

    /// Current constraint violation of a joint.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownJoint`] for unknown joints.
    pub fn joint_violation(&self, id: JointId) -> sim_planar_types::Result<f64> {
        let (a, b) = self.joint_anchors(id)?;
        let kind = self
            .joint(id)
            .map(|j| j.def.kind)
            .ok_or(SimError::UnknownJoint(id))?;
        Ok(kind.violation((b - a).norm()))
    }

    /// Largest violation over all joints (0 without joints).
    #[must_use]
    pub fn max_joint_violation(&self) -> f64 {
        self.joints
            .iter()
            .filter_map(|j| self.joint_violation(j.id).ok())
            .fold(0.0, f64::max)
    }

    // =========================================================================
    // Force Application
    // =========================================================================

    /// Apply a force at a body's center of mass until the next step.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn apply_force(&mut self, id: BodyId, force: Vector2<f64>) -> sim_planar_types::Result<()> {
        self.body_or_err(id)?.apply_force(force);
        Ok(())
    }

    /// Apply a torque to a body until the next step.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for unknown bodies.
    pub fn apply_torque(&mut self, id: BodyId, torque: f64) -> sim_planar_types::Result<()> {
        self.body_or_err(id)?.apply_torque(torque);
        Ok(())
    }

    /// Clear all accumulated forces on all bodies.
    pub fn clear_forces(&mut self) {
        for body in &mut self.bodies {
            body.clear_forces();
        }
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance the world by `dt` seconds.
    ///
    /// Runs `substeps` position-based sub-steps, each integrating forces,
    /// solving joints and contacts for `iterations` passes, then deriving
    /// velocities from the corrected positions. Accumulated forces are
    /// cleared afterwards.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidTimestep`] for non-positive or non-finite `dt`
    /// - [`SimError::Diverged`] if any body state becomes non-finite
    pub fn step(&mut self, dt: f64) -> sim_planar_types::Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimestep(dt));
        }

        let links = solver::resolve_joints(&self.joints, &self.body_index);
        let h = dt / self.config.substeps.max(1) as f64;
        for _ in 0..self.config.substeps.max(1) {
            solver::substep(&mut self.bodies, &links, &self.config, h);
        }
        self.clear_forces();

        self.time += dt;
        self.step_count += 1;
        self.validate()
    }

    /// Check that every body state is finite.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Diverged`] naming the first offending body.
    pub fn validate(&self) -> sim_planar_types::Result<()> {
        match self.bodies.iter().find(|b| !b.is_finite()) {
            Some(body) => Err(SimError::diverged(body.id, self.step_count)),
            None => Ok(()),
        }
    }
}
