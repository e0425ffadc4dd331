//! Planar rigid-body physics.
//!
//! This crate steps a 2-D world of rigid bodies linked by pivot and pin
//! joints, builds on [`sim_planar_types`] for the data structures, and is
//! the engine behind `sim-rope` chains.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         World                                │
//! │  Contains: bodies, joints, configuration, time              │
//! │  Provides: entity management, force application, queries    │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ step(dt)
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Solver                                │
//! │  Sub-steps: integrate → joints + contacts → velocities      │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Contact                               │
//! │  Capsule narrow phase, collision filters                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use sim_planar::World;
//! use sim_planar_types::{JointDef, Material, Pose2, Shape, SimulationConfig};
//! use nalgebra::Point2;
//!
//! let mut world = World::new(SimulationConfig::default());
//! let rod = Shape::Rect { width: 1.0, height: 0.02 };
//! let a = world.add_dynamic_body(rod, Material::default(), Pose2::identity()).unwrap();
//! let b = world
//!     .add_dynamic_body(rod, Material::default(), Pose2::from_position(Point2::new(1.0, 0.0)))
//!     .unwrap();
//! world.set_collision_group(a, 1).unwrap();
//! world.set_collision_group(b, 1).unwrap();
//! let joint = world
//!     .add_joint(JointDef::pivot(a, b, Point2::new(0.5, 0.0), Point2::new(-0.5, 0.0)))
//!     .unwrap();
//!
//! world.step(world.timestep()).unwrap();
//! assert!(world.joint_violation(joint).unwrap() < 1e-9);
//! ```
//!
//! # Determinism
//!
//! Bodies and joints are processed in insertion order, so identical inputs
//! produce identical trajectories.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::needless_range_loop
)]

mod contact;
mod solver;
mod world;

pub use contact::{capsule_contact, closest_points_segments, Capsule, ContactGeometry};
pub use world::{Body, Joint, World};

/// Result type for world operations.
pub type Result<T> = sim_planar_types::Result<T>;
