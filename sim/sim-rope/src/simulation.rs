//! Frame loop over a physics backend and its ropes.

use loop_curves::Curve2D;
use sim_planar_types::{BodyId, Pose2};
use tracing::{debug, info};

use crate::{
    Actor, ActorId, Chain, ChainBuilder, ChainId, ChainRegistry, CollisionGrouper,
    CurveReconstructor, JointLinker, PhysicsBackend, Reconstruction, Result, RopeConfig,
    RopeError,
};

/// Owns a physics backend plus the chains and actors living in it.
///
/// A frame is: [`Self::step`], then one [`Self::curve`] call per chain
/// to draw. Curves are always derived from the poses after the most
/// recent step.
///
/// # Example
///
/// ```
/// use loop_curves::AnalyticCurve;
/// use nalgebra::Point2;
/// use sim_planar::World;
/// use sim_planar_types::SimulationConfig;
/// use sim_rope::{RopeConfig, RopeSimulation};
///
/// let mut sim = RopeSimulation::new(World::new(SimulationConfig::default()));
/// let loop_curve = AnalyticCurve::circle(Point2::new(0.0, 1.0), 1.0, 0.0);
/// let rope = sim.spawn_rope(&loop_curve, &RopeConfig::closed_loop(12), None).unwrap();
///
/// sim.step().unwrap();
/// let frame = sim.curve(rope).unwrap();
/// assert!(!frame.is_degraded());
/// ```
#[derive(Debug)]
pub struct RopeSimulation<B: PhysicsBackend> {
    backend: B,
    registry: ChainRegistry,
    chains: Vec<Chain>,
    actors: Vec<Actor>,
    frame: u64,
}

impl<B: PhysicsBackend> RopeSimulation<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: ChainRegistry::new(),
            chains: Vec::new(),
            actors: Vec::new(),
            frame: 0,
        }
    }

    /// The physics backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, for scene bodies such as obstacles.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // =========================================================================
    // Chains
    // =========================================================================

    /// Build, link and group a rope along `curve`.
    ///
    /// Either the whole rope exists afterwards or nothing of it does: any
    /// failure removes the bodies created for it and puts the pendant back
    /// where it was, in its previous collision group.
    ///
    /// # Errors
    ///
    /// Any construction error of [`ChainBuilder`], [`JointLinker`] or
    /// [`CollisionGrouper`].
    pub fn spawn_rope<C>(&mut self, curve: &C, config: &RopeConfig, pendant: Option<BodyId>) -> Result<ChainId>
    where
        C: Curve2D + ?Sized,
    {
        let mut chain = ChainBuilder::new(config.clone()).build(&mut self.backend, &mut self.registry, curve)?;

        let snapshot = pendant.and_then(|body| {
            let pose = self.backend.pose(body)?;
            let group = self.backend.collision_group(body)?;
            Some(PendantSnapshot { body, pose, group })
        });

        let mut linker = JointLinker::new(config.close_loop);
        if let Some(body) = pendant {
            linker = linker.with_pendant(body);
        }
        let linked = linker.link(&mut self.backend, &mut chain).and_then(|()| {
            if config.self_intersect {
                Ok(())
            } else {
                CollisionGrouper::group(&mut self.backend, &mut chain).map(|_| ())
            }
        });

        if let Err(err) = linked {
            for joint in chain.joints() {
                self.backend.remove_joint(joint.id);
            }
            for body in chain.bodies() {
                self.backend.remove_body(body);
            }
            if let Some(snapshot) = snapshot {
                snapshot.restore(&mut self.backend)?;
            }
            info!(chain = chain.id().raw(), %err, "rope construction aborted");
            return Err(err);
        }

        let id = chain.id();
        self.chains.push(chain);
        Ok(id)
    }

    /// Look up a chain.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id() == id)
    }

    /// Live chains in creation order.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// This frame's curve of a chain.
    ///
    /// # Errors
    ///
    /// [`RopeError::UnknownChain`] for a missing chain,
    /// [`RopeError::MissingBody`] if a segment was removed behind the
    /// simulation's back.
    pub fn curve(&self, id: ChainId) -> Result<Reconstruction> {
        CurveReconstructor::reconstruct(&self.backend, self.chain_or_err(id)?)
    }

    /// Current pose of every segment of a chain, in chain order.
    ///
    /// # Errors
    ///
    /// As [`Self::curve`].
    pub fn segment_poses(&self, id: ChainId) -> Result<Vec<Pose2>> {
        self.chain_or_err(id)?
            .bodies()
            .map(|body| self.backend.pose(body).ok_or(RopeError::missing_body(body)))
            .collect()
    }

    /// Constraint violation of every joint of a chain.
    ///
    /// # Errors
    ///
    /// As [`Self::curve`].
    pub fn joint_violations(&self, id: ChainId) -> Result<Vec<f64>> {
        self.chain_or_err(id)?
            .joints()
            .iter()
            .map(|joint| self.backend.joint_violation(joint.id).map_err(RopeError::from))
            .collect()
    }

    /// Stop a chain from colliding with `body`.
    ///
    /// # Errors
    ///
    /// See [`CollisionGrouper::release`].
    pub fn release(&mut self, id: ChainId, body: BodyId) -> Result<()> {
        let chain = self
            .chains
            .iter()
            .find(|c| c.id() == id)
            .ok_or(RopeError::UnknownChain(id))?;
        CollisionGrouper::release(&mut self.backend, chain, body)
    }

    /// Remove a chain's joints and segment bodies.
    ///
    /// A pendant stays in the world and returns to the group it had
    /// before the chain grouped it.
    ///
    /// # Errors
    ///
    /// [`RopeError::UnknownChain`] for a missing chain.
    pub fn teardown(&mut self, id: ChainId) -> Result<Chain> {
        let index = self
            .chains
            .iter()
            .position(|c| c.id() == id)
            .ok_or(RopeError::UnknownChain(id))?;
        let chain = self.chains.remove(index);

        for joint in chain.joints() {
            self.backend.remove_joint(joint.id);
        }
        for body in chain.bodies() {
            self.backend.remove_body(body);
        }
        if let (Some(body), Some(group)) = (chain.pendant(), chain.pendant_previous_group()) {
            if self.backend.contains_body(body) {
                self.backend.set_collision_group(body, group)?;
            }
        }
        debug!(chain = id.raw(), segments = chain.len(), "tore down chain");
        Ok(chain)
    }

    fn chain_or_err(&self, id: ChainId) -> Result<&Chain> {
        self.chain(id).ok_or(RopeError::UnknownChain(id))
    }

    // =========================================================================
    // Actors
    // =========================================================================

    /// Register an actor on an existing body.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::MissingBody`] if the body does not exist.
    pub fn add_actor(&mut self, body: BodyId) -> Result<ActorId> {
        if !self.backend.contains_body(body) {
            return Err(RopeError::missing_body(body));
        }
        self.actors.push(Actor::new(body));
        Ok(ActorId(self.actors.len() - 1))
    }

    /// Look up an actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    /// Mutable access to an actor, to change its force.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance one frame: actors push, then the backend steps by its
    /// fixed timestep.
    ///
    /// # Errors
    ///
    /// Returns an error if an actor's body is gone or the backend fails.
    pub fn step(&mut self) -> Result<()> {
        for actor in &self.actors {
            actor.apply(&mut self.backend)?;
        }
        let dt = self.backend.timestep();
        self.backend.step(dt)?;
        self.frame += 1;
        Ok(())
    }

    /// Advance `frames` frames.
    ///
    /// # Errors
    ///
    /// See [`Self::step`].
    pub fn run(&mut self, frames: usize) -> Result<()> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(())
    }
}

/// Pendant state from before a spawn touched it.
#[derive(Debug, Clone, Copy)]
struct PendantSnapshot {
    body: BodyId,
    pose: Pose2,
    group: u64,
}

impl PendantSnapshot {
    fn restore<B: PhysicsBackend>(self, backend: &mut B) -> Result<()> {
        if backend.contains_body(self.body) {
            backend.set_position(self.body, self.pose.position)?;
            backend.set_collision_group(self.body, self.group)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use loop_curves::AnalyticCurve;
    use nalgebra::{Point2, Vector2};
    use sim_planar::World;
    use sim_planar_types::{JointDef, JointId, Material, Shape, SimulationConfig};

    fn sim() -> RopeSimulation<World> {
        RopeSimulation::new(World::new(SimulationConfig::default()))
    }

    fn circle() -> AnalyticCurve {
        AnalyticCurve::circle(Point2::new(0.0, 1.0), 1.0, 0.0)
    }

    #[test]
    fn test_spawn_and_teardown() {
        let mut sim = sim();
        let rope = sim.spawn_rope(&circle(), &RopeConfig::closed_loop(10), None).unwrap();
        assert_eq!(sim.backend().body_count(), 10);
        assert_eq!(sim.backend().joint_count(), 10);
        assert_eq!(sim.chain(rope).unwrap().collision_group(), Some(rope.collision_group()));

        let chain = sim.teardown(rope).unwrap();
        assert_eq!(chain.len(), 10);
        assert_eq!(sim.backend().body_count(), 0);
        assert_eq!(sim.backend().joint_count(), 0);
        assert!(matches!(sim.curve(rope), Err(RopeError::UnknownChain(_))));
        assert!(sim.teardown(rope).is_err());
    }

    #[test]
    fn test_failed_spawn_leaves_nothing() {
        let mut sim = sim();
        let open = AnalyticCurve::segment(Point2::origin(), Point2::new(2.0, 0.0));
        let err = sim
            .spawn_rope(&open, &RopeConfig::closed_loop(6), None)
            .unwrap_err();
        assert!(err.is_open_loop());
        assert_eq!(sim.backend().body_count(), 0);
        assert_eq!(sim.backend().joint_count(), 0);
        assert!(sim.chains().is_empty());
    }

    #[test]
    fn test_self_intersecting_rope_is_not_grouped() {
        let mut sim = sim();
        let config = RopeConfig::closed_loop(8).self_intersecting();
        let rope = sim.spawn_rope(&circle(), &config, None).unwrap();
        assert!(sim.chain(rope).unwrap().collision_group().is_none());
    }

    #[test]
    fn test_actor_drags_pendant() {
        let mut sim = sim();
        let clip = sim
            .backend_mut()
            .add_dynamic_body(
                Shape::Circle { radius: 0.05 },
                Material::new(0.1, 0.1, 0.8),
                Pose2::identity(),
            )
            .unwrap();
        let rope = sim
            .spawn_rope(&circle(), &RopeConfig::closed_loop(12), Some(clip))
            .unwrap();
        assert_eq!(sim.chain(rope).unwrap().joints().len(), 14);

        let actor = sim.add_actor(clip).unwrap();
        sim.actor_mut(actor).unwrap().set_force(Vector2::new(0.0, -0.01));
        let start = sim.backend().body(clip).unwrap().pose.position;
        sim.run(5).unwrap();
        let end = sim.backend().body(clip).unwrap().pose.position;
        assert!(end.y < start.y);
        assert_eq!(sim.frame(), 5);
        assert_relative_eq!(sim.actor(actor).unwrap().force().y, -0.01);
    }

    #[test]
    fn test_unknown_actor_body() {
        let mut sim = sim();
        assert!(sim.add_actor(BodyId(42)).is_err());
    }

    #[test]
    fn test_teardown_frees_pendant() {
        let mut sim = sim();
        let clip = sim
            .backend_mut()
            .add_dynamic_body(Shape::Circle { radius: 0.05 }, Material::default(), Pose2::identity())
            .unwrap();
        sim.backend_mut().set_collision_group(clip, 7).unwrap();
        let rope = sim
            .spawn_rope(&circle(), &RopeConfig::closed_loop(6), Some(clip))
            .unwrap();
        assert_eq!(sim.backend().body(clip).unwrap().filter.group, rope.collision_group());

        sim.teardown(rope).unwrap();
        assert!(sim.backend().contains_body(clip));
        assert_eq!(sim.backend().body(clip).unwrap().filter.group, 7);
    }

    /// World that refuses to put bodies into one collision group.
    #[derive(Debug)]
    struct GroupLimitedWorld {
        world: World,
        refused: u64,
    }

    impl PhysicsBackend for GroupLimitedWorld {
        fn add_dynamic_body(
            &mut self,
            shape: Shape,
            material: Material,
            pose: Pose2,
        ) -> sim_planar_types::Result<BodyId> {
            self.world.add_dynamic_body(shape, material, pose)
        }

        fn remove_body(&mut self, id: BodyId) -> bool {
            PhysicsBackend::remove_body(&mut self.world, id)
        }

        fn contains_body(&self, id: BodyId) -> bool {
            self.world.contains_body(id)
        }

        fn pose(&self, id: BodyId) -> Option<Pose2> {
            PhysicsBackend::pose(&self.world, id)
        }

        fn set_position(&mut self, id: BodyId, position: Point2<f64>) -> sim_planar_types::Result<()> {
            self.world.set_position(id, position)
        }

        fn set_collision_group(&mut self, id: BodyId, group: u64) -> sim_planar_types::Result<()> {
            if group == self.refused {
                return Err(sim_planar_types::SimError::invalid_config(format!(
                    "group {group} is reserved"
                )));
            }
            self.world.set_collision_group(id, group)
        }

        fn collision_group(&self, id: BodyId) -> Option<u64> {
            PhysicsBackend::collision_group(&self.world, id)
        }

        fn add_joint(&mut self, def: JointDef) -> sim_planar_types::Result<JointId> {
            self.world.add_joint(def)
        }

        fn remove_joint(&mut self, id: JointId) -> bool {
            PhysicsBackend::remove_joint(&mut self.world, id)
        }

        fn joint_violation(&self, id: JointId) -> sim_planar_types::Result<f64> {
            self.world.joint_violation(id)
        }

        fn apply_force(&mut self, id: BodyId, force: Vector2<f64>) -> sim_planar_types::Result<()> {
            self.world.apply_force(id, force)
        }

        fn apply_torque(&mut self, id: BodyId, torque: f64) -> sim_planar_types::Result<()> {
            self.world.apply_torque(id, torque)
        }

        fn timestep(&self) -> f64 {
            self.world.timestep()
        }

        fn step(&mut self, dt: f64) -> sim_planar_types::Result<()> {
            self.world.step(dt)
        }
    }

    #[test]
    fn test_failed_grouping_restores_pendant() {
        let mut world = World::new(SimulationConfig::default());
        let start = Point2::new(4.0, -3.0);
        let clip = world
            .add_dynamic_body(
                Shape::Circle { radius: 0.05 },
                Material::default(),
                Pose2::from_position(start),
            )
            .unwrap();
        world.set_collision_group(clip, 3).unwrap();

        // Chain ids start at 1, so the first rope cannot be grouped.
        let mut sim = RopeSimulation::new(GroupLimitedWorld {
            world,
            refused: 1,
        });
        let err = sim
            .spawn_rope(&circle(), &RopeConfig::closed_loop(8), Some(clip))
            .unwrap_err();
        assert!(matches!(err, RopeError::Sim(_)));

        let backend = &sim.backend().world;
        assert_eq!(backend.body_count(), 1);
        assert_eq!(backend.joint_count(), 0);
        assert!(sim.chains().is_empty());

        let body = backend.body(clip).unwrap();
        assert_relative_eq!(body.pose.position.x, start.x);
        assert_relative_eq!(body.pose.position.y, start.y);
        assert_eq!(body.filter.group, 3);
    }
}
