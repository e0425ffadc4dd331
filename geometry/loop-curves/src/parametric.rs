//! The closed set of curve representations.

use nalgebra::Point2;

use crate::{AnalyticCurve, Blend, Concatenation, Curve2D, Domain, Polyline2, SplineCurve};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any curve this crate can build, evaluate and compose.
///
/// Composite variants ([`Concatenation`], [`Blend`]) own their parts, so a
/// `ParametricCurve` is a plain value tree with no shared callbacks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParametricCurve {
    /// Piecewise-linear curve through sampled points.
    Sampled(Polyline2),
    /// Closed-form formula.
    Analytic(AnalyticCurve),
    /// Interpolating cubic spline.
    Spline(SplineCurve),
    /// Curves traversed one after another.
    Concat(Concatenation),
    /// Linear blend of two curves.
    Blend(Blend),
}

impl ParametricCurve {
    /// Short name of the representation, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sampled(_) => "sampled",
            Self::Analytic(_) => "analytic",
            Self::Spline(_) => "spline",
            Self::Concat(_) => "concat",
            Self::Blend(_) => "blend",
        }
    }

    /// The curve reversed in direction, sampled as a polyline with `n` vertices.
    #[must_use]
    pub fn reversed(&self, n: usize) -> Self {
        let mut sampled = Polyline2::from_curve(self, n).vertices().to_vec();
        sampled.reverse();
        match Polyline2::try_new(sampled) {
            Ok(polyline) => Self::Sampled(polyline),
            Err(_) => self.clone(),
        }
    }
}

impl Curve2D for ParametricCurve {
    fn domain(&self) -> Domain {
        match self {
            Self::Sampled(c) => c.domain(),
            Self::Analytic(c) => c.domain(),
            Self::Spline(c) => c.domain(),
            Self::Concat(c) => c.domain(),
            Self::Blend(c) => c.domain(),
        }
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        match self {
            Self::Sampled(c) => c.point_at(t),
            Self::Analytic(c) => c.point_at(t),
            Self::Spline(c) => c.point_at(t),
            Self::Concat(c) => c.point_at(t),
            Self::Blend(c) => c.point_at(t),
        }
    }
}

impl From<Polyline2> for ParametricCurve {
    fn from(curve: Polyline2) -> Self {
        Self::Sampled(curve)
    }
}

impl From<AnalyticCurve> for ParametricCurve {
    fn from(curve: AnalyticCurve) -> Self {
        Self::Analytic(curve)
    }
}

impl From<SplineCurve> for ParametricCurve {
    fn from(curve: SplineCurve) -> Self {
        Self::Spline(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_keeps_domain() {
        let drop: ParametricCurve =
            AnalyticCurve::teardrop(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0), 1.0, 2).into();
        assert_relative_eq!(drop.domain().end, std::f64::consts::TAU);
        assert_eq!(drop.kind(), "analytic");
    }

    #[test]
    fn test_reversed() {
        let line: ParametricCurve =
            AnalyticCurve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).into();
        let back = line.reversed(11);
        assert_relative_eq!(back.start().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(back.end().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(back.point_at(0.3).x, 0.7, epsilon = 1e-12);
    }
}
