//! Joint definitions.

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BodyId;

/// Unique identifier for a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointId(pub u64);

impl JointId {
    /// Create a new joint ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// Kind of two-body constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Both anchors share one world point; relative rotation is free.
    Pivot,
    /// Anchors are held `rest_length` apart; relative rotation is free.
    Pin {
        /// Distance kept between the anchors.
        rest_length: f64,
    },
}

impl JointKind {
    /// Anchor separation the joint maintains.
    #[must_use]
    pub fn rest_length(&self) -> f64 {
        match *self {
            Self::Pivot => 0.0,
            Self::Pin { rest_length } => rest_length,
        }
    }

    /// Constraint violation for a given anchor separation.
    #[must_use]
    pub fn violation(&self, separation: f64) -> f64 {
        (separation - self.rest_length()).abs()
    }
}

/// A constraint between two bodies at local anchor points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDef {
    /// First body.
    pub body_a: BodyId,
    /// Second body.
    pub body_b: BodyId,
    /// Anchor in `body_a`'s local frame.
    pub anchor_a: Point2<f64>,
    /// Anchor in `body_b`'s local frame.
    pub anchor_b: Point2<f64>,
    /// Constraint kind.
    pub kind: JointKind,
}

impl JointDef {
    /// Pivot joint.
    #[must_use]
    pub fn pivot(
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Point2<f64>,
        anchor_b: Point2<f64>,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            kind: JointKind::Pivot,
        }
    }

    /// Pin joint with the given rest length.
    #[must_use]
    pub fn pin(
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Point2<f64>,
        anchor_b: Point2<f64>,
        rest_length: f64,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            kind: JointKind::Pin { rest_length },
        }
    }

    /// Whether the joint involves `body`.
    #[must_use]
    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }
}
