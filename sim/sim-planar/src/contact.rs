//! Narrow-phase contact detection.
//!
//! Every shape is treated as a capsule: a core segment swept by a disc.
//! Circles have a zero-length core, rectangles a core along their local x
//! axis (see [`Shape::capsule`]). Capsule pairs reduce to the closest points
//! between two segments.

use nalgebra::{Point2, Vector2};
use sim_planar_types::{Pose2, Shape};

const EPSILON: f64 = 1e-12;

/// World-space capsule of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Core segment start.
    pub p: Point2<f64>,
    /// Core segment end.
    pub q: Point2<f64>,
    /// Sweep radius.
    pub radius: f64,
}

impl Capsule {
    /// Place a shape's capsule at `pose`.
    #[must_use]
    pub fn from_shape(shape: &Shape, pose: &Pose2) -> Self {
        let (half, radius) = shape.capsule();
        let offset = pose.axis() * half;
        Self {
            p: pose.position - offset,
            q: pose.position + offset,
            radius,
        }
    }

    /// Radius of a disc around the center containing the capsule.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        0.5 * (self.q - self.p).norm() + self.radius
    }

    /// Center of the core segment.
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.p, &self.q)
    }
}

/// Overlap between two capsules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// Unit normal pointing from the first shape into the second.
    pub normal: Vector2<f64>,
    /// Deepest point of the first shape inside the second.
    pub point_a: Point2<f64>,
    /// Deepest point of the second shape inside the first.
    pub point_b: Point2<f64>,
    /// Penetration depth, `(point_a - point_b) · normal`.
    pub depth: f64,
}

/// Closest points between segments `p1q1` and `p2q2`.
///
/// Returns `(c1, c2)` with `c1` on the first segment.
#[must_use]
pub fn closest_points_segments(
    p1: Point2<f64>,
    q1: Point2<f64>,
    p2: Point2<f64>,
    q2: Point2<f64>,
) -> (Point2<f64>, Point2<f64>) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Contact between two capsules, if they overlap.
#[must_use]
pub fn capsule_contact(a: &Capsule, b: &Capsule) -> Option<ContactGeometry> {
    let reach = a.radius + b.radius;
    if (b.center() - a.center()).norm() > a.bounding_radius() + b.bounding_radius() {
        return None;
    }

    let (ca, cb) = closest_points_segments(a.p, a.q, b.p, b.q);
    let delta = cb - ca;
    let dist = delta.norm();
    if dist >= reach {
        return None;
    }

    let normal = if dist > EPSILON {
        delta / dist
    } else {
        // Cores cross: push along the core normal of `a`, towards `b`.
        let axis = a.q - a.p;
        let perp = if axis.norm() > EPSILON {
            Vector2::new(-axis.y, axis.x).normalize()
        } else {
            Vector2::x()
        };
        if perp.dot(&(b.center() - a.center())) < 0.0 {
            -perp
        } else {
            perp
        }
    };

    let point_a = ca + normal * a.radius;
    let point_b = cb - normal * b.radius;
    Some(ContactGeometry {
        normal,
        point_a,
        point_b,
        depth: reach - dist,
    })
}
