//! Ropes and loops simulated as chains of rigid segments.
//!
//! A curve is sampled into short rigid bodies, adjacent bodies are pinned
//! together where their samples meet, and every frame a smooth curve is
//! fitted back through the joint anchors for drawing.
//!
//! # Pipeline
//!
//! ```text
//! curve ──► ChainBuilder ──► JointLinker ──► CollisionGrouper ──► Chain
//!                                                                   │
//!        ┌──────────────── every frame ─────────────────────────────┤
//!        ▼                                                          ▼
//!   Actor::apply ──► PhysicsBackend::step ──► CurveReconstructor ──► curve
//! ```
//!
//! - [`ChainBuilder`]: one dynamic body per pair of consecutive samples
//! - [`JointLinker`]: pivot joints between segments, loop closure, pendant pins
//! - [`CollisionGrouper`]: one collision group per chain
//! - [`CurveReconstructor`]: spline through the live anchors
//! - [`RopeSimulation`]: all of the above over one [`PhysicsBackend`]
//!
//! Chains are identified by [`ChainId`]s from a [`ChainRegistry`], which
//! also makes their collision groups unique.
//!
//! # Quick Start
//!
//! ```
//! use loop_curves::{AnalyticCurve, Curve2D};
//! use nalgebra::Point2;
//! use sim_planar::World;
//! use sim_planar_types::SimulationConfig;
//! use sim_rope::{RopeConfig, RopeSimulation};
//!
//! let mut sim = RopeSimulation::new(World::new(SimulationConfig::default()));
//! let teardrop = AnalyticCurve::teardrop(Point2::new(-3.0, 1.5), Point2::origin(), 1.0, 2);
//! let rope = sim.spawn_rope(&teardrop, &RopeConfig::closed_loop(12), None).unwrap();
//!
//! sim.step().unwrap();
//! assert!(sim.joint_violations(rope).unwrap().iter().all(|v| *v < 1e-6));
//!
//! let frame = sim.curve(rope).unwrap();
//! assert!(frame.curve.is_loop_closed());
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Serialize configurations, chains and actors

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::suboptimal_flops,
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::float_cmp
)]

mod actor;
mod backend;
mod builder;
mod chain;
mod config;
mod error;
mod grouper;
mod linker;
mod reconstruct;
mod registry;
mod simulation;

pub use actor::{Actor, ActorId};
pub use backend::PhysicsBackend;
pub use builder::{orientation, plan_segments, ChainBuilder, SegmentPlan, MIN_SEGMENT_LENGTH};
pub use chain::{Chain, ChainSegment, JointConstraint, JointRole};
pub use config::{RopeConfig, DEFAULT_OFFSET};
pub use error::{RopeError, SplineFitDegradeWarning};
pub use grouper::CollisionGrouper;
pub use linker::JointLinker;
pub use reconstruct::{CurveReconstructor, Reconstruction};
pub use registry::{ChainId, ChainRegistry};
pub use simulation::RopeSimulation;

/// Result type for rope operations.
pub type Result<T> = std::result::Result<T, RopeError>;
