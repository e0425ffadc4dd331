//! Planar parametric curves for closed loops.
//!
//! This crate provides the curve side of rope simulation: fitting smooth
//! curves through the sample points of a chain, joining curves end to end,
//! and blending one loop into another.
//!
//! - [`Polyline2`] - Piecewise linear curve, parameterized by arc length
//! - [`AnalyticCurve`] - Closed-form circle, teardrop and segment
//! - [`SplineCurve`] - Interpolating cubic spline, natural or periodic
//! - [`concat`] - Curves traversed one after another
//! - [`morph`] / [`Homotopy`] - Linear blend between two curves
//!
//! All of them are variants of [`ParametricCurve`], a closed value type that
//! owns its parts.
//!
//! # Core Trait
//!
//! Every curve implements [`Curve2D`]: a map from its parameter [`Domain`]
//! to a point. Parameters outside the domain are clamped.
//!
//! # Example
//!
//! ```
//! use loop_curves::{AnalyticCurve, Curve2D, Polyline2, SplineBoundary, SplineCurve};
//! use nalgebra::Point2;
//!
//! // Sample a teardrop and fit a spline back through the samples
//! let drop = AnalyticCurve::teardrop(Point2::new(-3.0, 1.5), Point2::new(0.0, 0.0), 1.0, 2);
//! let samples = Polyline2::from_curve(&drop, 13);
//! let spline = SplineCurve::fit(samples.vertices(), SplineBoundary::Natural).unwrap();
//!
//! assert!(spline.endpoint_gap() < 1e-9);
//! ```
//!
//! # Loop Notation
//!
//! The [`notation`] module turns words such as `"BT'"` into control points
//! of loops wound around two nails.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all curve types

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
    clippy::cast_lossless,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::neg_cmp_op_on_partial_ord,
    clippy::float_cmp,
    clippy::needless_range_loop,
    clippy::return_self_not_must_use
)]

mod analytic;
mod error;
mod homotopy;
pub mod notation;
mod ops;
mod parametric;
mod polyline;
mod spline;
mod traits;

pub use analytic::AnalyticCurve;
pub use error::CurveError;
pub use homotopy::{morph, Blend, CurveStatus, ForbiddenRegion, Homotopy, MorphFrame};
pub use notation::{loop_curve, parse_points};
pub use ops::{concat, Concatenation, JOIN_TOLERANCE};
pub use parametric::ParametricCurve;
pub use polyline::Polyline2;
pub use spline::{SplineBoundary, SplineCurve};
pub use traits::{Curve2D, Domain, LOOP_TOLERANCE};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

/// Result type for curve operations.
pub type Result<T> = std::result::Result<T, CurveError>;
