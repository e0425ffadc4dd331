//! Closed-form curves.
//!
//! These are the shapes ropes are usually laid out along before simulation
//! starts: circles, teardrop loops hanging from a point, and straight runs.

use std::f64::consts::{PI, TAU};

use nalgebra::{Point2, Rotation2, Vector2};

use crate::{Curve2D, Domain};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A curve given by a formula.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalyticCurve {
    /// Full circle over `[0, 1]`: `center + r·(cos(2πt + phase), sin(2πt + phase))`.
    Circle {
        /// Circle center.
        center: Point2<f64>,
        /// Circle radius.
        radius: f64,
        /// Angle of the point at `t = 0`.
        phase: f64,
    },
    /// Teardrop loop over `[0, 2π]`, tip at `tail` (`t = 0` and `t = 2π`)
    /// and rounded end at `head` (`t = π`).
    ///
    /// In the frame aligned with `head → tail`, the shape is
    /// `L·(cos t, width·sin t·sin(t/2)^exponent)` with `L` half the
    /// head-tail distance.
    Teardrop {
        /// Rounded end of the drop.
        head: Point2<f64>,
        /// Pointed end, where the loop starts and closes.
        tail: Point2<f64>,
        /// Bulge of the drop relative to its half length.
        width: f64,
        /// Sharpness of the tip; larger is pointier.
        exponent: i32,
    },
    /// Straight segment over `[0, 1]`.
    Segment {
        /// Point at `t = 0`.
        start: Point2<f64>,
        /// Point at `t = 1`.
        end: Point2<f64>,
    },
}

impl AnalyticCurve {
    /// Circle starting at angle `phase`.
    #[must_use]
    pub fn circle(center: Point2<f64>, radius: f64, phase: f64) -> Self {
        Self::Circle {
            center,
            radius,
            phase,
        }
    }

    /// Teardrop between `head` and `tail`.
    #[must_use]
    pub fn teardrop(head: Point2<f64>, tail: Point2<f64>, width: f64, exponent: i32) -> Self {
        Self::Teardrop {
            head,
            tail,
            width,
            exponent,
        }
    }

    /// Straight segment.
    #[must_use]
    pub fn segment(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self::Segment { start, end }
    }
}

impl Curve2D for AnalyticCurve {
    fn domain(&self) -> Domain {
        match self {
            Self::Circle { .. } | Self::Segment { .. } => Domain::UNIT,
            Self::Teardrop { .. } => Domain {
                start: 0.0,
                end: TAU,
            },
        }
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        let t = self.domain().clamp(t);
        match self {
            Self::Circle {
                center,
                radius,
                phase,
            } => {
                let theta = 2.0 * PI * t + phase;
                center + Vector2::new(theta.cos(), theta.sin()) * *radius
            }
            Self::Teardrop {
                head,
                tail,
                width,
                exponent,
            } => {
                let axis = tail - head;
                let half_length = axis.norm() / 2.0;
                let center = head + axis / 2.0;
                let rotation = Rotation2::new(axis.y.atan2(axis.x));
                let local = Vector2::new(t.cos(), width * t.sin() * (t / 2.0).sin().powi(*exponent));
                center + rotation * local * half_length
            }
            Self::Segment { start, end } => start + (end - start) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_is_closed() {
        let c = AnalyticCurve::circle(Point2::new(0.0, 1.8), 1.8, -PI / 2.0);
        assert!(c.is_loop_closed());
        let bottom = c.point_at(0.0);
        assert_relative_eq!(bottom.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bottom.y, 0.0, epsilon = 1e-12);
        let top = c.point_at(0.5);
        assert_relative_eq!(top.y, 3.6, epsilon = 1e-12);
    }

    #[test]
    fn test_teardrop_tip_and_head() {
        let head = Point2::new(-3.0, 1.5);
        let tail = Point2::origin();
        let drop = AnalyticCurve::teardrop(head, tail, 1.0, 2);

        assert_eq!(drop.domain().end, TAU);
        assert!(drop.is_loop_closed());

        let tip = drop.point_at(0.0);
        assert_relative_eq!(tip.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(tip.y, 0.0, epsilon = 1e-12);

        let rounded = drop.point_at(PI);
        assert_relative_eq!(rounded.x, head.x, epsilon = 1e-12);
        assert_relative_eq!(rounded.y, head.y, epsilon = 1e-12);
    }

    #[test]
    fn test_teardrop_has_width() {
        let drop = AnalyticCurve::teardrop(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0), 1.0, 2);
        // Halfway round, the drop bulges away from the axis.
        let side = drop.point_at(PI / 2.0);
        assert!(side.y.abs() > 0.1);
    }

    #[test]
    fn test_segment() {
        let s = AnalyticCurve::segment(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
        assert_relative_eq!(s.point_at(0.5).y, 2.0);
        assert!(!s.is_loop_closed());
    }
}
