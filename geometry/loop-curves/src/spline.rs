//! Interpolating cubic splines.
//!
//! A [`SplineCurve`] passes through every input point. Knots are placed by
//! cumulative chord length and normalized to `[0, 1]`, so the curve is
//! parameterized roughly by arc length regardless of how unevenly the input
//! points are spaced.
//!
//! # Boundary conditions
//!
//! - [`SplineBoundary::Natural`]: zero curvature at both ends. Used for open
//!   paths.
//! - [`SplineBoundary::Periodic`]: position, slope and curvature match across
//!   the wrap-around. The last input point only fixes the length of the
//!   closing knot span; its value is replaced by the first point. Feeding
//!   `first + small offset` as the last point therefore closes the loop
//!   without a zero-length span.
//!
//! # Fitting
//!
//! Second derivatives at the knots are found by solving the (cyclic)
//! tridiagonal moment equations with a dense LU decomposition. Chains have
//! a few dozen knots, so the dense solve is cheap and handles the cyclic
//! corner entries without special casing.

use nalgebra::{DMatrix, Point2, Vector2};

use crate::{Curve2D, CurveError, Domain, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Boundary condition of an interpolating spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplineBoundary {
    /// Zero second derivative at both ends.
    #[default]
    Natural,
    /// Closed curve, smooth across the wrap-around.
    Periodic,
}

impl SplineBoundary {
    /// Minimum number of input points for a fit.
    #[must_use]
    pub fn min_points(self) -> usize {
        match self {
            Self::Natural => 2,
            Self::Periodic => 3,
        }
    }
}

/// A cubic spline interpolating a sequence of points.
///
/// # Example
///
/// ```
/// use loop_curves::{Curve2D, SplineBoundary, SplineCurve};
/// use nalgebra::Point2;
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.0, 0.001),
/// ];
/// let spline = SplineCurve::fit(&points, SplineBoundary::Periodic).unwrap();
///
/// // Periodic fits close on the first point.
/// assert!(spline.is_loop_closed());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplineCurve {
    /// Normalized knot parameters, strictly increasing, `0` to `1`.
    knots: Vec<f64>,
    /// Interpolated values at the knots.
    values: Vec<Point2<f64>>,
    /// Second derivatives at the knots.
    moments: Vec<Vector2<f64>>,
    boundary: SplineBoundary,
}

impl SplineCurve {
    /// Fit a spline through `points` with chord-length knots.
    ///
    /// # Errors
    ///
    /// - [`CurveError::InsufficientPoints`] if there are too few points for
    ///   the boundary condition
    /// - [`CurveError::NumericalError`] on non-finite input or a singular system
    /// - [`CurveError::InvalidKnots`] if two consecutive points coincide
    pub fn fit(points: &[Point2<f64>], boundary: SplineBoundary) -> Result<Self> {
        check_points(points, boundary)?;

        let mut knots = Vec::with_capacity(points.len());
        let mut total = 0.0;
        knots.push(0.0);
        for pair in points.windows(2) {
            total += (pair[1] - pair[0]).norm();
            knots.push(total);
        }
        if !(total > 0.0) || !total.is_finite() {
            return Err(CurveError::degenerate("points span zero length"));
        }
        for knot in &mut knots {
            *knot /= total;
        }
        Self::fit_with_knots(points, &knots, boundary)
    }

    /// Fit a spline through `points` at explicit knot parameters.
    ///
    /// Knots are rescaled to `[0, 1]`; they must be strictly increasing.
    ///
    /// # Errors
    ///
    /// As [`Self::fit`], plus [`CurveError::InvalidKnots`] when the knot
    /// count does not match or knots are not strictly increasing.
    pub fn fit_with_knots(
        points: &[Point2<f64>],
        knots: &[f64],
        boundary: SplineBoundary,
    ) -> Result<Self> {
        check_points(points, boundary)?;
        if knots.len() != points.len() {
            return Err(CurveError::invalid_knots(format!(
                "{} knots for {} points",
                knots.len(),
                points.len()
            )));
        }
        for (i, pair) in knots.windows(2).enumerate() {
            if !(pair[1] > pair[0]) || !pair[1].is_finite() {
                return Err(CurveError::invalid_knots(format!(
                    "knot {} ({}) does not follow knot {} ({})",
                    i + 1,
                    pair[1],
                    i,
                    pair[0]
                )));
            }
        }

        let first = knots[0];
        let span = knots[knots.len() - 1] - first;
        let knots: Vec<f64> = knots.iter().map(|k| (k - first) / span).collect();

        let mut values = points.to_vec();
        if boundary == SplineBoundary::Periodic {
            let last = values.len() - 1;
            values[last] = values[0];
        }

        let moments = match boundary {
            SplineBoundary::Natural => natural_moments(&knots, &values)?,
            SplineBoundary::Periodic => periodic_moments(&knots, &values)?,
        };

        Ok(Self {
            knots,
            values,
            moments,
            boundary,
        })
    }

    /// Fit a periodic spline through a closed loop of samples.
    ///
    /// `first + (offset, offset)` is appended as the closing knot.
    ///
    /// # Errors
    ///
    /// See [`Self::fit`].
    pub fn periodic_loop(points: &[Point2<f64>], offset: f64) -> Result<Self> {
        Self::fit(&with_closing_point(points, offset), SplineBoundary::Periodic)
    }

    /// Fit a natural spline through `points` followed by `first + (offset, offset)`.
    ///
    /// The result starts and ends (almost) at the first point, so hand-drawn
    /// loops given as an open point list come out closed.
    ///
    /// # Errors
    ///
    /// See [`Self::fit`].
    pub fn natural_loop(points: &[Point2<f64>], offset: f64) -> Result<Self> {
        Self::fit(&with_closing_point(points, offset), SplineBoundary::Natural)
    }

    /// Normalized knot parameters.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Interpolated points, one per knot.
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.values
    }

    /// Boundary condition used for the fit.
    #[must_use]
    pub fn boundary(&self) -> SplineBoundary {
        self.boundary
    }

    /// Index of the knot span containing `t`.
    fn span_index(&self, t: f64) -> usize {
        let last = self.knots.len() - 2;
        self.knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last)
    }
}

impl Curve2D for SplineCurve {
    fn domain(&self) -> Domain {
        Domain::UNIT
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        let t = t.clamp(0.0, 1.0);
        let i = self.span_index(t);
        let (u0, u1) = (self.knots[i], self.knots[i + 1]);
        let h = u1 - u0;
        let a = u1 - t;
        let b = t - u0;

        let (y0, y1) = (self.values[i].coords, self.values[i + 1].coords);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);

        let cubic = m0 * (a * a * a / (6.0 * h)) + m1 * (b * b * b / (6.0 * h));
        let linear = (y0 / h - m0 * (h / 6.0)) * a + (y1 / h - m1 * (h / 6.0)) * b;
        Point2::from(cubic + linear)
    }
}

fn with_closing_point(points: &[Point2<f64>], offset: f64) -> Vec<Point2<f64>> {
    let mut closed = Vec::with_capacity(points.len() + 1);
    closed.extend_from_slice(points);
    if let Some(first) = points.first() {
        closed.push(first + Vector2::new(offset, offset));
    }
    closed
}

fn check_points(points: &[Point2<f64>], boundary: SplineBoundary) -> Result<()> {
    let required = boundary.min_points();
    if points.len() < required {
        return Err(CurveError::insufficient_points(required, points.len()));
    }
    if let Some(i) = points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(CurveError::numerical(format!("point {i} is not finite")));
    }
    Ok(())
}

/// Divided difference `(y[i+1] - y[i]) / h[i]`.
fn slope(values: &[Point2<f64>], knots: &[f64], i: usize) -> Vector2<f64> {
    (values[i + 1] - values[i]) / (knots[i + 1] - knots[i])
}

fn solve_moments(matrix: DMatrix<f64>, rhs: &DMatrix<f64>) -> Result<Vec<Vector2<f64>>> {
    let solution = matrix
        .lu()
        .solve(rhs)
        .ok_or_else(|| CurveError::numerical("spline moment system is singular"))?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(CurveError::numerical("spline moment system is ill-conditioned"));
    }
    Ok((0..solution.nrows())
        .map(|r| Vector2::new(solution[(r, 0)], solution[(r, 1)]))
        .collect())
}

fn natural_moments(knots: &[f64], values: &[Point2<f64>]) -> Result<Vec<Vector2<f64>>> {
    let n = values.len();
    let mut matrix = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DMatrix::<f64>::zeros(n, 2);

    matrix[(0, 0)] = 1.0;
    matrix[(n - 1, n - 1)] = 1.0;
    for i in 1..n - 1 {
        let h_prev = knots[i] - knots[i - 1];
        let h_next = knots[i + 1] - knots[i];
        matrix[(i, i - 1)] = h_prev;
        matrix[(i, i)] = 2.0 * (h_prev + h_next);
        matrix[(i, i + 1)] = h_next;

        let jump = (slope(values, knots, i) - slope(values, knots, i - 1)) * 6.0;
        rhs[(i, 0)] = jump.x;
        rhs[(i, 1)] = jump.y;
    }

    solve_moments(matrix, &rhs)
}

fn periodic_moments(knots: &[f64], values: &[Point2<f64>]) -> Result<Vec<Vector2<f64>>> {
    // Unknowns are the moments at knots 0..n; the closing knot repeats knot 0.
    let n = values.len() - 1;
    let mut matrix = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DMatrix::<f64>::zeros(n, 2);

    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let h_prev = knots[prev + 1] - knots[prev];
        let h_next = knots[i + 1] - knots[i];

        matrix[(i, prev)] += h_prev;
        matrix[(i, i)] += 2.0 * (h_prev + h_next);
        matrix[(i, next)] += h_next;

        let jump = (slope(values, knots, i) - slope(values, knots, prev)) * 6.0;
        rhs[(i, 0)] = jump.x;
        rhs[(i, 1)] = jump.y;
    }

    let mut moments = solve_moments(matrix, &rhs)?;
    moments.push(moments[0]);
    Ok(moments)
}
