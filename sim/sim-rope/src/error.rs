//! Error types for rope construction and reconstruction.

use std::fmt;

use loop_curves::CurveError;
use sim_planar_types::{BodyId, SimError};
use thiserror::Error;

use crate::ChainId;

/// Errors that can occur while building, linking or driving a rope.
#[derive(Debug, Error)]
pub enum RopeError {
    /// Two consecutive curve samples coincide.
    #[error("segment {index} is degenerate: length {length} (curve is not regular at this sampling)")]
    DegenerateSegment {
        /// Index of the segment, in sample order.
        index: usize,
        /// Distance between the two samples.
        length: f64,
    },

    /// Loop closure requested for a curve whose endpoints do not meet.
    #[error("cannot close loop: curve endpoints are {gap} apart")]
    OpenCurveLoop {
        /// Distance between the images of the domain endpoints.
        gap: f64,
    },

    /// A body the rope refers to is not in the physics world.
    #[error("{body} has no rigid body in the physics world")]
    MissingBody {
        /// The handle that could not be resolved.
        body: BodyId,
    },

    /// A pendant was supplied for a chain that is not closed.
    #[error("a pendant can only ride a closed chain")]
    PendantRequiresLoop,

    /// Rope configuration is invalid.
    #[error("invalid rope configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// No live chain has this id.
    #[error("unknown chain {0}")]
    UnknownChain(ChainId),

    /// Physics engine error.
    #[error("physics error: {0}")]
    Sim(#[from] SimError),

    /// Curve error.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),
}

impl RopeError {
    /// Create a degenerate segment error.
    #[must_use]
    pub fn degenerate_segment(index: usize, length: f64) -> Self {
        Self::DegenerateSegment { index, length }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a missing body error.
    #[must_use]
    pub fn missing_body(body: BodyId) -> Self {
        Self::MissingBody { body }
    }

    /// Check if this error aborted chain construction.
    ///
    /// Construction errors leave nothing behind in the physics world.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::DegenerateSegment { .. }
                | Self::OpenCurveLoop { .. }
                | Self::MissingBody { .. }
                | Self::PendantRequiresLoop
                | Self::InvalidConfig { .. }
        )
    }

    /// Check if this is an open loop error.
    #[must_use]
    pub fn is_open_loop(&self) -> bool {
        matches!(self, Self::OpenCurveLoop { .. })
    }
}

/// A reconstruction that fell back to the raw anchor polyline.
///
/// Not an error: the frame still renders, just without smoothing.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineFitDegradeWarning {
    /// Chain whose curve degraded.
    pub chain: ChainId,
    /// Number of anchor points the fit was attempted on.
    pub anchors: usize,
    /// Why the spline fit failed.
    pub cause: CurveError,
}

impl fmt::Display for SplineFitDegradeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spline fit for {} over {} anchors failed ({}); using polyline",
            self.chain, self.anchors, self.cause
        )
    }
}
