//! Core curve traits.
//!
//! Every curve in this crate is a map from a closed parameter interval
//! [`Domain`] to a point in the plane. Unlike unit-interval curve libraries,
//! the interval is part of the curve: a teardrop is naturally defined over
//! `[0, 2π]`, a fitted spline over `[0, 1]`.

use nalgebra::Point2;

use crate::{CurveError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance below which two endpoints are considered the same point.
pub const LOOP_TOLERANCE: f64 = 1e-9;

/// A closed parameter interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Domain {
    /// First parameter value.
    pub start: f64,
    /// Last parameter value.
    pub end: f64,
}

impl Domain {
    /// The unit interval `[0, 1]`.
    pub const UNIT: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    /// Create a domain, validating that `start < end` and both are finite.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidDomain`] for empty, reversed or
    /// non-finite intervals.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(CurveError::InvalidDomain { start, end });
        }
        Ok(Self { start, end })
    }

    /// Length of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Map `s ∈ [0, 1]` onto the interval.
    ///
    /// `s == 0` and `s == 1` return the endpoints exactly.
    #[must_use]
    pub fn lerp(&self, s: f64) -> f64 {
        if s <= 0.0 {
            self.start
        } else if s >= 1.0 {
            self.end
        } else {
            self.start + self.span() * s
        }
    }

    /// Map a parameter of this interval onto `[0, 1]`.
    #[must_use]
    pub fn normalize(&self, t: f64) -> f64 {
        (t - self.start) / self.span()
    }

    /// Clamp a parameter into the interval.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.start, self.end)
    }

    /// The `i`-th of `n + 1` equally spaced parameters, `t_i = t0 + (t1 - t0)·i/n`.
    #[must_use]
    pub fn sample_parameter(&self, i: usize, n: usize) -> f64 {
        if i == 0 {
            return self.start;
        }
        if i >= n {
            return self.end;
        }
        self.start + self.span() * i as f64 / n as f64
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::UNIT
    }
}

/// A parametric curve in the plane.
///
/// # Implementors
///
/// - [`Polyline2`](crate::Polyline2) - Piecewise linear
/// - [`AnalyticCurve`](crate::AnalyticCurve) - Closed-form formulas
/// - [`SplineCurve`](crate::SplineCurve) - Interpolating cubic splines
/// - [`Concatenation`](crate::Concatenation) - Curves traversed one after another
/// - [`Blend`](crate::Blend) - Linear homotopy between two curves
/// - [`ParametricCurve`](crate::ParametricCurve) - Any of the above
pub trait Curve2D {
    /// Parameter interval of the curve.
    fn domain(&self) -> Domain;

    /// Evaluate the curve at parameter `t`.
    ///
    /// Parameters outside [`Self::domain`] are clamped.
    fn point_at(&self, t: f64) -> Point2<f64>;

    /// Evaluate the curve at a normalized position `s ∈ [0, 1]`.
    fn point_at_normalized(&self, s: f64) -> Point2<f64> {
        self.point_at(self.domain().lerp(s))
    }

    /// Point at the start of the domain.
    fn start(&self) -> Point2<f64> {
        self.point_at(self.domain().start)
    }

    /// Point at the end of the domain.
    fn end(&self) -> Point2<f64> {
        self.point_at(self.domain().end)
    }

    /// Distance between the images of the two domain endpoints.
    fn endpoint_gap(&self) -> f64 {
        (self.end() - self.start()).norm()
    }

    /// Check whether the curve is loop-closed (endpoint gap below [`LOOP_TOLERANCE`]).
    fn is_loop_closed(&self) -> bool {
        self.endpoint_gap() < LOOP_TOLERANCE
    }

    /// Sample `n` points at uniform parameter spacing, endpoints included.
    fn sample_uniform(&self, n: usize) -> Vec<Point2<f64>> {
        let n = n.max(2);
        let domain = self.domain();
        (0..n)
            .map(|i| self.point_at(domain.sample_parameter(i, n - 1)))
            .collect()
    }

    /// Approximate arc length from `n` uniform samples.
    fn approximate_length(&self, n: usize) -> f64 {
        self.sample_uniform(n)
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Diagonal;

    impl Curve2D for Diagonal {
        fn domain(&self) -> Domain {
            Domain {
                start: 1.0,
                end: 3.0,
            }
        }

        fn point_at(&self, t: f64) -> Point2<f64> {
            let t = self.domain().clamp(t);
            Point2::new(t, t)
        }
    }

    #[test]
    fn test_domain_validation() {
        assert!(Domain::new(0.0, 1.0).is_ok());
        assert!(Domain::new(1.0, 1.0).is_err());
        assert!(Domain::new(2.0, 1.0).is_err());
        assert!(Domain::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_domain_mapping() {
        let d = Domain::new(-2.0, 2.0).unwrap();
        assert_relative_eq!(d.lerp(0.25), -1.0);
        assert_relative_eq!(d.normalize(1.0), 0.75);
        assert_eq!(d.lerp(0.0), -2.0);
        assert_eq!(d.lerp(1.0), 2.0);
        assert_eq!(d.sample_parameter(0, 4), -2.0);
        assert_eq!(d.sample_parameter(4, 4), 2.0);
        assert_relative_eq!(d.sample_parameter(1, 4), -1.0);
    }

    #[test]
    fn test_provided_methods() {
        let c = Diagonal;
        assert_relative_eq!(c.start().x, 1.0);
        assert_relative_eq!(c.end().y, 3.0);
        assert_relative_eq!(c.point_at_normalized(0.5).x, 2.0);
        assert!(!c.is_loop_closed());
        assert_relative_eq!(c.endpoint_gap(), 8.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(c.sample_uniform(5).len(), 5);
        assert_relative_eq!(c.approximate_length(10), 8.0_f64.sqrt(), epsilon = 1e-12);
    }
}
