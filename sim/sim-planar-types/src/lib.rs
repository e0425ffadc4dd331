//! Core types for planar rigid-body simulation.
//!
//! This crate provides the data shared between a 2-D physics world and the
//! code driving it:
//!
//! - [`BodyId`], [`Pose2`], [`Velocity2`] - Identity and state of a body
//! - [`Shape`], [`MassProperties2`], [`Material`] - What a body is made of
//! - [`CollisionFilter`] - Which bodies collide
//! - [`JointDef`], [`JointKind`] - Pivot and pin constraints
//! - [`SimulationConfig`] - Timestep and solver settings
//!
//! # Design Philosophy
//!
//! These types are **pure data**. The stepping itself lives in
//! `sim-planar`; chain construction and curve reconstruction in `sim-rope`.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: up
//! - Angles counter-clockwise, in radians
//!
//! # Example
//!
//! ```
//! use sim_planar_types::{Pose2, Shape};
//! use nalgebra::Point2;
//!
//! let pose = Pose2::from_position(Point2::new(0.0, 1.0));
//! let rod = Shape::Rect { width: 0.5, height: 0.01 };
//!
//! assert_eq!(pose.position.y, 1.0);
//! assert!(rod.mass_properties(0.1).mass > 0.0);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::neg_cmp_op_on_partial_ord, // NaN-rejecting comparisons
)]

mod body;
mod config;
mod error;
mod filter;
mod joint;

pub use body::{BodyId, BodyKind, MassProperties2, Material, Pose2, Shape, Velocity2};
pub use config::SimulationConfig;
pub use error::SimError;
pub use filter::CollisionFilter;
pub use joint::{JointDef, JointId, JointKind};

// Re-export math types for convenience
pub use nalgebra::{Isometry2, Point2, Vector2};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
