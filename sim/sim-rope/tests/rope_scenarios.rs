//! End-to-end rope scenarios over the planar world.
//!
//! Run with: cargo test -p sim-rope --test rope_scenarios

#![allow(clippy::unwrap_used, clippy::expect_used)]

use approx::assert_relative_eq;
use loop_curves::notation::notation_curve;
use loop_curves::{AnalyticCurve, Curve2D, ParametricCurve};
use nalgebra::{Point2, Vector2};
use sim_planar::World;
use sim_planar_types::{Material, Pose2, Shape, SimulationConfig};
use sim_rope::{
    plan_segments, ChainBuilder, ChainRegistry, CurveReconstructor, JointLinker, JointRole,
    RopeConfig, RopeError, RopeSimulation,
};

fn teardrop() -> AnalyticCurve {
    AnalyticCurve::teardrop(Point2::new(-3.0, 1.5), Point2::new(0.0, 0.0), 1.0, 2)
}

fn simulation() -> RopeSimulation<World> {
    RopeSimulation::new(World::new(SimulationConfig::default()))
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn teardrop_chain_survives_first_frame() {
    let mut sim = simulation();
    let rope = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(12), None)
        .unwrap();

    let chain = sim.chain(rope).unwrap();
    assert_eq!(chain.len(), 12);
    assert_eq!(chain.joints().len(), 12);

    sim.step().unwrap();

    let violations = sim.joint_violations(rope).unwrap();
    assert_eq!(violations.len(), 12);
    for (i, v) in violations.iter().enumerate() {
        assert!(*v < 1e-6, "joint {i} violated by {v}");
    }
}

#[test]
fn closed_chain_topology() {
    let mut world = World::new(SimulationConfig::default());
    let mut registry = ChainRegistry::new();
    let mut chain = ChainBuilder::new(RopeConfig::closed_loop(9))
        .build(&mut world, &mut registry, &teardrop())
        .unwrap();
    JointLinker::new(true).link(&mut world, &mut chain).unwrap();

    let bodies: Vec<_> = chain.bodies().collect();
    for (i, joint) in chain.joints().iter().enumerate() {
        assert!(bodies.contains(&joint.def.body_a));
        assert!(bodies.contains(&joint.def.body_b));
        if i < 8 {
            assert_eq!(joint.role, JointRole::Link { from: i });
            assert_eq!(joint.def.body_a, bodies[i]);
            assert_eq!(joint.def.body_b, bodies[i + 1]);
        } else {
            assert_eq!(joint.role, JointRole::Closure);
            assert_eq!(joint.def.body_a, bodies[8]);
            assert_eq!(joint.def.body_b, bodies[0]);
        }
    }
}

#[test]
fn chains_never_share_a_group() {
    let mut sim = simulation();
    let a = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(8), None)
        .unwrap();
    let b = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(8), None)
        .unwrap();
    let ga = sim.chain(a).unwrap().collision_group().unwrap();
    let gb = sim.chain(b).unwrap().collision_group().unwrap();
    assert_ne!(ga, gb);

    // Ids stay unique after a teardown.
    sim.teardown(a).unwrap();
    let c = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(8), None)
        .unwrap();
    assert_ne!(sim.chain(c).unwrap().collision_group().unwrap(), ga);
}

#[test]
fn open_curve_refuses_to_close() {
    let mut sim = simulation();
    let arc = AnalyticCurve::segment(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.5));
    let err = sim
        .spawn_rope(&arc, &RopeConfig::closed_loop(10), None)
        .unwrap_err();

    let RopeError::OpenCurveLoop { gap } = err else {
        panic!("expected an open loop error, got {err}");
    };
    assert_relative_eq!(gap, (2.0f64 * 2.0 + 0.25).sqrt(), epsilon = 1e-12);
    assert_eq!(sim.backend().joint_count(), 0);
    assert_eq!(sim.backend().body_count(), 0);
}

#[test]
fn notation_loops_spawn_as_open_ropes() {
    let curve = notation_curve("BT").unwrap();
    let mut sim = simulation();

    // The closing knot offset keeps the drawn loop a hair open.
    assert!(sim
        .spawn_rope(&curve, &RopeConfig::closed_loop(16), None)
        .unwrap_err()
        .is_open_loop());

    let rope = sim.spawn_rope(&curve, &RopeConfig::open(16), None).unwrap();
    assert_eq!(sim.chain(rope).unwrap().joints().len(), 15);
}

// =============================================================================
// Reconstruction
// =============================================================================

#[test]
fn reconstruction_at_rest_hits_the_samples() {
    let mut world = World::new(SimulationConfig::default());
    let mut chain = ChainBuilder::new(RopeConfig::closed_loop(12))
        .build(&mut world, &mut ChainRegistry::new(), &teardrop())
        .unwrap();
    JointLinker::new(true).link(&mut world, &mut chain).unwrap();

    let anchors = CurveReconstructor::anchor_points(&world, &chain).unwrap();
    let plans = plan_segments(&teardrop(), 12).unwrap();
    for (anchor, plan) in anchors.iter().zip(&plans) {
        assert_relative_eq!((anchor - plan.end).norm(), 0.0, epsilon = 1e-9);
    }

    let frame = CurveReconstructor::reconstruct(&world, &chain).unwrap();
    let ParametricCurve::Spline(spline) = &frame.curve else {
        panic!("expected a spline");
    };
    for (knot, anchor) in spline.knots().iter().zip(&anchors) {
        assert_relative_eq!((spline.point_at(*knot) - anchor).norm(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn curve_follows_the_bodies() {
    let mut sim = simulation();
    let rope = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(12), None)
        .unwrap();
    let before = sim.curve(rope).unwrap().curve.point_at(0.25);

    let bodies: Vec<_> = sim.chain(rope).unwrap().bodies().collect();
    for body in bodies {
        let pose = sim.backend().body(body).unwrap().pose;
        sim.backend_mut()
            .set_position(body, pose.position + Vector2::new(0.0, 2.0))
            .unwrap();
    }

    let after = sim.curve(rope).unwrap().curve.point_at(0.25);
    assert_relative_eq!(after.x, before.x, epsilon = 1e-9);
    assert_relative_eq!(after.y, before.y + 2.0, epsilon = 1e-9);
}

// =============================================================================
// Dynamics
// =============================================================================

#[test]
fn dragged_pendant_keeps_the_loop_together() {
    let mut sim = simulation();
    let clip = sim
        .backend_mut()
        .add_dynamic_body(
            Shape::Circle { radius: 0.05 },
            Material::new(0.1, 0.1, 0.8),
            Pose2::identity(),
        )
        .unwrap();
    let rope = sim
        .spawn_rope(&teardrop(), &RopeConfig::closed_loop(12), Some(clip))
        .unwrap();

    let actor = sim.add_actor(clip).unwrap();
    sim.actor_mut(actor)
        .unwrap()
        .set_force(Vector2::new(0.0, -0.005));
    sim.run(30).unwrap();

    for v in sim.joint_violations(rope).unwrap() {
        assert!(v.is_finite());
        assert!(v < 0.05, "violation {v}");
    }
    let frame = sim.curve(rope).unwrap();
    assert!(frame.curve.point_at(0.5).coords.iter().all(|c| c.is_finite()));
}

#[test]
fn obstacle_released_from_chain_stops_colliding() {
    let mut sim = RopeSimulation::new(World::new(
        SimulationConfig::default().with_gravity(9.81),
    ));
    let rope = sim
        .spawn_rope(
            &AnalyticCurve::circle(Point2::new(0.0, 1.0), 1.0, 0.0),
            &RopeConfig::closed_loop(16),
            None,
        )
        .unwrap();
    let nail = sim
        .backend_mut()
        .add_static_body(Shape::Circle { radius: 0.05 }, Pose2::from_position(Point2::new(0.0, 1.8)))
        .unwrap();

    sim.release(rope, nail).unwrap();
    let group = sim.chain(rope).unwrap().collision_group().unwrap();
    assert_eq!(sim.backend().body(nail).unwrap().filter.group, group);

    let before = sim.curve(rope).unwrap().curve.point_at(0.25);
    sim.run(10).unwrap();
    let after = sim.curve(rope).unwrap().curve.point_at(0.25);
    assert!(after.y < before.y - 0.1, "rope fell from {} to {}", before.y, after.y);
}
