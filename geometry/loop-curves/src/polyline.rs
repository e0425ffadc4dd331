//! Polyline (piecewise linear) curves.
//!
//! Polylines are the fallback representation for live data that a spline
//! cannot be fitted through, and the sampled form of any other curve.

use nalgebra::Point2;

use crate::{Curve2D, CurveError, Domain, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A piecewise linear curve through a sequence of vertices.
///
/// The parameter `t ∈ [0, 1]` maps to the polyline by arc length:
/// `t = 0.5` is the point at half the total length.
///
/// # Example
///
/// ```
/// use loop_curves::{Curve2D, Polyline2};
/// use nalgebra::Point2;
///
/// let polyline = Polyline2::try_new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
/// ])
/// .unwrap();
///
/// let mid = polyline.point_at(0.5);
/// assert!((mid.x - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polyline2 {
    vertices: Vec<Point2<f64>>,
    /// Cumulative arc length at each vertex.
    cumulative_lengths: Vec<f64>,
    total_length: f64,
}

impl Polyline2 {
    /// Create a polyline from at least two vertices.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InsufficientPoints`] if fewer than 2 vertices.
    pub fn try_new(vertices: Vec<Point2<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(CurveError::insufficient_points(2, vertices.len()));
        }

        let mut cumulative_lengths = Vec::with_capacity(vertices.len());
        let mut total_length = 0.0;
        cumulative_lengths.push(0.0);
        for pair in vertices.windows(2) {
            total_length += (pair[1] - pair[0]).norm();
            cumulative_lengths.push(total_length);
        }

        Ok(Self {
            vertices,
            cumulative_lengths,
            total_length,
        })
    }

    /// Create a closed polyline: the first vertex is repeated at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InsufficientPoints`] if fewer than 2 vertices.
    pub fn closed(mut vertices: Vec<Point2<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(CurveError::insufficient_points(2, vertices.len()));
        }
        let first = vertices[0];
        vertices.push(first);
        Self::try_new(vertices)
    }

    /// Sample any curve into a polyline with `n` vertices.
    pub fn from_curve<C: Curve2D + ?Sized>(curve: &C, n: usize) -> Self {
        let vertices = curve.sample_uniform(n);
        let mut cumulative_lengths = Vec::with_capacity(vertices.len());
        let mut total_length = 0.0;
        cumulative_lengths.push(0.0);
        for pair in vertices.windows(2) {
            total_length += (pair[1] - pair[0]).norm();
            cumulative_lengths.push(total_length);
        }
        Self {
            vertices,
            cumulative_lengths,
            total_length,
        }
    }

    /// The vertices of the polyline.
    #[must_use]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the polyline has no vertices (never true once constructed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.total_length
    }

    /// Find the segment containing arc length `arc` and the local parameter in it.
    fn segment_at_arc(&self, arc: f64) -> (usize, f64) {
        let last = self.vertices.len() - 2;
        if arc <= 0.0 {
            return (0, 0.0);
        }
        if arc >= self.total_length {
            return (last, 1.0);
        }

        // First cumulative length >= arc
        let idx = self.cumulative_lengths.partition_point(|&c| c < arc);
        let seg = idx.saturating_sub(1).min(last);
        let seg_start = self.cumulative_lengths[seg];
        let seg_len = self.cumulative_lengths[seg + 1] - seg_start;

        let local_t = if seg_len > 1e-12 {
            (arc - seg_start) / seg_len
        } else {
            0.0
        };
        (seg, local_t)
    }
}

impl Curve2D for Polyline2 {
    fn domain(&self) -> Domain {
        Domain::UNIT
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || self.total_length <= 0.0 {
            return self.vertices[0];
        }
        if t == 1.0 {
            return self.vertices[self.vertices.len() - 1];
        }
        let (seg, local) = self.segment_at_arc(t * self.total_length);
        let a = self.vertices[seg];
        let b = self.vertices[seg + 1];
        a + (b - a) * local
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner() -> Polyline2 {
        Polyline2::try_new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_requires_two_vertices() {
        assert!(Polyline2::try_new(vec![Point2::origin()]).is_err());
        assert!(Polyline2::closed(vec![]).is_err());
    }

    #[test]
    fn test_arc_length_parameterization() {
        let p = corner();
        assert_relative_eq!(p.length(), 2.0);
        let q = p.point_at(0.25);
        assert_relative_eq!(q.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(q.y, 0.0, epsilon = 1e-12);
        let q = p.point_at(0.75);
        assert_relative_eq!(q.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_endpoints_exact() {
        let p = corner();
        assert_eq!(p.point_at(0.0), Point2::new(0.0, 0.0));
        assert_eq!(p.point_at(1.0), Point2::new(1.0, 1.0));
        assert_eq!(p.point_at(7.0), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_closed_polyline_is_loop() {
        let p = Polyline2::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap();
        assert_eq!(p.len(), 4);
        assert!(p.is_loop_closed());
    }

    #[test]
    fn test_zero_length_polyline() {
        let p = Polyline2::try_new(vec![Point2::new(2.0, 2.0), Point2::new(2.0, 2.0)]).unwrap();
        assert_eq!(p.point_at(0.5), Point2::new(2.0, 2.0));
    }
}
