//! Linear homotopy between two curves.
//!
//! A homotopy animates one curve deforming into another: for a blend factor
//! `alpha ∈ [0, 1]` every parameter value moves on a straight line from
//! `a(t)` to `b(t)`. The blend factor itself is driven from outside, usually
//! by an easing function over the animation's duration.
//!
//! [`Homotopy`] adds a per-frame classification: if the blended curve passes
//! through a forbidden disc (say, over a nail it cannot cross) the frame is
//! flagged as a warning. Classification is recomputed from scratch for every
//! frame, with no memory of earlier frames.

use nalgebra::Point2;
use tracing::debug;

use crate::{Curve2D, CurveError, Domain, ParametricCurve, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear blend `alpha·to(t) + (1 - alpha)·from(t)`.
///
/// Evaluated over `from`'s domain. When the two domains differ, `to` is
/// evaluated at the same normalized position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blend {
    from: Box<ParametricCurve>,
    to: Box<ParametricCurve>,
    alpha: f64,
}

impl Blend {
    /// Blend factor.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Curve at `alpha = 0`.
    #[must_use]
    pub fn from_curve(&self) -> &ParametricCurve {
        &self.from
    }

    /// Curve at `alpha = 1`.
    #[must_use]
    pub fn to_curve(&self) -> &ParametricCurve {
        &self.to
    }

    fn target_at(&self, t: f64) -> Point2<f64> {
        let from_domain = self.from.domain();
        if self.to.domain() == from_domain {
            self.to.point_at(t)
        } else {
            self.to.point_at_normalized(from_domain.normalize(t))
        }
    }
}

impl Curve2D for Blend {
    fn domain(&self) -> Domain {
        self.from.domain()
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        // The endpoints of the animation return the inputs untouched.
        if self.alpha == 0.0 {
            return self.from.point_at(t);
        }
        if self.alpha == 1.0 {
            return self.target_at(t);
        }
        let a = self.from.point_at(t).coords;
        let b = self.target_at(t).coords;
        Point2::from(b * self.alpha + a * (1.0 - self.alpha))
    }
}

/// Blend `a` into `b` by `alpha`.
///
/// # Errors
///
/// Returns [`CurveError::InvalidAlpha`] if `alpha` is outside `[0, 1]`.
///
/// # Example
///
/// ```
/// use loop_curves::{morph, AnalyticCurve, Curve2D, ParametricCurve};
/// use nalgebra::Point2;
///
/// let a = ParametricCurve::from(AnalyticCurve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)));
/// let b = ParametricCurve::from(AnalyticCurve::segment(Point2::new(0.0, 2.0), Point2::new(1.0, 2.0)));
/// let halfway = morph(&a, &b, 0.5).unwrap();
///
/// assert!((halfway.point_at(0.5).y - 1.0).abs() < 1e-12);
/// ```
pub fn morph(a: &ParametricCurve, b: &ParametricCurve, alpha: f64) -> Result<ParametricCurve> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(CurveError::InvalidAlpha(alpha));
    }
    Ok(ParametricCurve::Blend(Blend {
        from: Box::new(a.clone()),
        to: Box::new(b.clone()),
        alpha,
    }))
}

/// Disc the animated curve should stay out of.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForbiddenRegion {
    /// Center of the disc.
    pub center: Point2<f64>,
    /// Radius of the disc; points at exactly this distance are inside.
    pub radius: f64,
}

impl ForbiddenRegion {
    /// Create a forbidden disc.
    #[must_use]
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies in the disc.
    #[must_use]
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        (point - self.center).norm() <= self.radius
    }
}

/// Classification of one morph frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurveStatus {
    /// No sample touches the forbidden region.
    #[default]
    Acceptable,
    /// At least one sample lies in the forbidden region.
    Warning,
}

/// One rendered step of a homotopy.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphFrame {
    /// Blend factor of this frame.
    pub alpha: f64,
    /// The blended curve.
    pub curve: ParametricCurve,
    /// Fixed-size sample buffer of the blended curve.
    pub points: Vec<Point2<f64>>,
    /// Classification against the forbidden region.
    pub status: CurveStatus,
}

/// Animated deformation of one curve into another.
#[derive(Debug, Clone)]
pub struct Homotopy {
    from: ParametricCurve,
    to: ParametricCurve,
    samples: usize,
    forbidden: Option<ForbiddenRegion>,
}

impl Homotopy {
    /// Default size of the per-frame sample buffer.
    pub const DEFAULT_SAMPLES: usize = 100;

    /// Create a homotopy from `from` to `to`.
    #[must_use]
    pub fn new(from: ParametricCurve, to: ParametricCurve) -> Self {
        Self {
            from,
            to,
            samples: Self::DEFAULT_SAMPLES,
            forbidden: None,
        }
    }

    /// Set the number of samples per frame (at least 2).
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(2);
        self
    }

    /// Flag frames whose curve enters `region`.
    #[must_use]
    pub fn with_forbidden_region(mut self, region: ForbiddenRegion) -> Self {
        self.forbidden = Some(region);
        self
    }

    /// Number of samples per frame.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Compute the frame for blend factor `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidAlpha`] if `alpha` is outside `[0, 1]`.
    pub fn frame(&self, alpha: f64) -> Result<MorphFrame> {
        let curve = morph(&self.from, &self.to, alpha)?;
        let points = curve.sample_uniform(self.samples);
        let status = self.classify(&points);
        if status == CurveStatus::Warning {
            debug!(alpha, "morphed curve enters forbidden region");
        }
        Ok(MorphFrame {
            alpha,
            curve,
            points,
            status,
        })
    }

    /// Classify a sample set against the forbidden region.
    #[must_use]
    pub fn classify(&self, points: &[Point2<f64>]) -> CurveStatus {
        match &self.forbidden {
            Some(region) if points.iter().any(|p| region.contains(p)) => CurveStatus::Warning,
            _ => CurveStatus::Acceptable,
        }
    }
}
