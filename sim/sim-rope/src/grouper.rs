//! Collision grouping of chain bodies.

use sim_planar_types::BodyId;
use tracing::debug;

use crate::{Chain, PhysicsBackend, Result, RopeError};

/// Tags a chain's bodies so they never collide with each other.
///
/// Segments and pendant share the chain's collision group, so adjacent
/// links do not fight their own joints. Bodies outside the group still
/// collide with the whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionGrouper;

impl CollisionGrouper {
    /// Put every segment and the pendant into the chain's group.
    ///
    /// The pendant's previous group is kept on the chain so it can be
    /// handed back on teardown. Returns the group.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::MissingBody`] if a body of the chain is gone.
    pub fn group<B>(backend: &mut B, chain: &mut Chain) -> Result<u64>
    where
        B: PhysicsBackend + ?Sized,
    {
        let group = chain.id().collision_group();
        let bodies: Vec<BodyId> = chain.bodies().chain(chain.pendant()).collect();
        for &body in &bodies {
            if !backend.contains_body(body) {
                return Err(RopeError::missing_body(body));
            }
        }
        let previous = chain.pendant().and_then(|body| backend.collision_group(body));
        for &body in &bodies {
            backend.set_collision_group(body, group)?;
        }
        chain.set_group(group, previous);
        debug!(chain = chain.id().raw(), group, bodies = bodies.len(), "grouped chain");
        Ok(group)
    }

    /// Move an outside body into the chain's group.
    ///
    /// The body stops colliding with the chain, which then slides off it
    /// as if it had disappeared.
    ///
    /// # Errors
    ///
    /// - [`RopeError::InvalidConfig`] if the chain was never grouped
    /// - [`RopeError::MissingBody`] if `body` is not in `backend`
    pub fn release<B>(backend: &mut B, chain: &Chain, body: BodyId) -> Result<()>
    where
        B: PhysicsBackend + ?Sized,
    {
        let Some(group) = chain.collision_group() else {
            return Err(RopeError::invalid_config(format!(
                "{} has no collision group",
                chain.id()
            )));
        };
        if !backend.contains_body(body) {
            return Err(RopeError::missing_body(body));
        }
        backend.set_collision_group(body, group)?;
        debug!(chain = chain.id().raw(), body = body.raw(), "released body from chain");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{ChainBuilder, ChainRegistry, JointLinker, RopeConfig};
    use loop_curves::AnalyticCurve;
    use nalgebra::Point2;
    use sim_planar::World;
    use sim_planar_types::{Pose2, Shape, SimulationConfig};

    fn circle() -> AnalyticCurve {
        AnalyticCurve::circle(Point2::new(0.0, 2.0), 2.0, 0.0)
    }

    #[test]
    fn test_chains_get_distinct_groups() {
        let mut world = World::new(SimulationConfig::default());
        let mut registry = ChainRegistry::new();
        let builder = ChainBuilder::new(RopeConfig::closed_loop(6));
        let mut a = builder.build(&mut world, &mut registry, &circle()).unwrap();
        let mut b = builder.build(&mut world, &mut registry, &circle()).unwrap();

        let ga = CollisionGrouper::group(&mut world, &mut a).unwrap();
        let gb = CollisionGrouper::group(&mut world, &mut b).unwrap();
        assert_ne!(ga, gb);
        assert_eq!(a.collision_group(), Some(ga));

        let sa = world.body(a.segments()[0].body).unwrap();
        let sa2 = world.body(a.segments()[1].body).unwrap();
        let sb = world.body(b.segments()[0].body).unwrap();
        assert!(!sa.filter.can_collide_with(&sa2.filter));
        assert!(sa.filter.can_collide_with(&sb.filter));
    }

    #[test]
    fn test_pendant_joins_group() {
        let mut world = World::new(SimulationConfig::default());
        let mut chain = ChainBuilder::new(RopeConfig::closed_loop(6))
            .build(&mut world, &mut ChainRegistry::new(), &circle())
            .unwrap();
        let clip = world
            .add_dynamic_body(
                Shape::Circle { radius: 0.1 },
                sim_planar_types::Material::default(),
                Pose2::identity(),
            )
            .unwrap();
        JointLinker::new(true)
            .with_pendant(clip)
            .link(&mut world, &mut chain)
            .unwrap();
        world.set_collision_group(clip, 5).unwrap();
        let group = CollisionGrouper::group(&mut world, &mut chain).unwrap();
        assert_eq!(world.body(clip).unwrap().filter.group, group);
        assert_eq!(chain.pendant_previous_group(), Some(5));
    }

    #[test]
    fn test_release_obstacle() {
        let mut world = World::new(SimulationConfig::default());
        let mut chain = ChainBuilder::new(RopeConfig::closed_loop(6))
            .build(&mut world, &mut ChainRegistry::new(), &circle())
            .unwrap();
        let nail = world
            .add_static_body(Shape::Circle { radius: 0.05 }, Pose2::identity())
            .unwrap();

        assert!(CollisionGrouper::release(&mut world, &chain, nail).is_err());
        CollisionGrouper::group(&mut world, &mut chain).unwrap();

        let segment = world.body(chain.segments()[0].body).unwrap().filter;
        assert!(segment.can_collide_with(&world.body(nail).unwrap().filter));
        CollisionGrouper::release(&mut world, &chain, nail).unwrap();
        assert!(!segment.can_collide_with(&world.body(nail).unwrap().filter));

        assert!(matches!(
            CollisionGrouper::release(&mut world, &chain, BodyId(999)),
            Err(RopeError::MissingBody { .. })
        ));
    }
}
