//! Discretizing a curve into rigid segments.
//!
//! Building happens in two phases. [`plan_segments`] samples the curve and
//! computes every segment's pose without touching the physics world, so a
//! degenerate sample aborts before anything exists. [`ChainBuilder::build`]
//! then creates one dynamic body per planned segment.

use loop_curves::Curve2D;
use nalgebra::{Point2, Vector2};
use sim_planar_types::{BodyId, Pose2, Shape};
use tracing::{debug, info};

use crate::{Chain, ChainRegistry, ChainSegment, PhysicsBackend, Result, RopeConfig, RopeError};

/// Sample spacing below which a segment is considered degenerate.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Cross products this small count as collinear with the x axis.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// Pose and size of one segment, before any body exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlan {
    /// Position in the chain.
    pub index: usize,
    /// Earlier sample.
    pub start: Point2<f64>,
    /// Later sample.
    pub end: Point2<f64>,
    /// Orientation flag, `+1` or `-1`.
    pub sign: f64,
    /// Body rotation.
    pub angle: f64,
}

impl SegmentPlan {
    /// Midpoint of the two samples.
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Distance between the two samples.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Pose of the segment body.
    #[must_use]
    pub fn pose(&self) -> Pose2 {
        Pose2::new(self.center(), self.angle)
    }
}

/// Orientation flag and body angle for a unit direction.
///
/// The flag is `-sgn(direction × x̂)`, forced to `+1` when the cross product
/// vanishes. The angle `acos(sign · direction · x̂)` then turns the body's
/// `sign`-side onto the direction. The tie-break is arbitrary; any fixed
/// choice works as long as anchors use the same flag.
#[must_use]
pub fn orientation(direction: &Vector2<f64>) -> (f64, f64) {
    let cross = direction.perp(&Vector2::x());
    let sign = if cross > COLLINEAR_TOLERANCE { -1.0 } else { 1.0 };
    let angle = (sign * direction.x).clamp(-1.0, 1.0).acos();
    (sign, angle)
}

/// Sample `segments + 1` points of `curve` and plan one segment per span.
///
/// # Errors
///
/// Returns [`RopeError::DegenerateSegment`] when two consecutive samples
/// are closer than [`MIN_SEGMENT_LENGTH`], and [`RopeError::InvalidConfig`]
/// for zero segments.
pub fn plan_segments<C: Curve2D + ?Sized>(curve: &C, segments: usize) -> Result<Vec<SegmentPlan>> {
    if segments == 0 {
        return Err(RopeError::invalid_config("need at least 1 segment"));
    }

    let domain = curve.domain();
    let mut plans = Vec::with_capacity(segments);
    let mut prev = curve.point_at(domain.start);
    for index in 0..segments {
        let point = curve.point_at(domain.sample_parameter(index + 1, segments));
        let delta = point - prev;
        let dist = delta.norm();
        if !(dist >= MIN_SEGMENT_LENGTH) {
            return Err(RopeError::degenerate_segment(index, dist));
        }
        let (sign, angle) = orientation(&(delta / dist));
        plans.push(SegmentPlan {
            index,
            start: prev,
            end: point,
            sign,
            angle,
        });
        prev = point;
    }
    Ok(plans)
}

/// Creates the bodies of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBuilder {
    config: RopeConfig,
}

impl ChainBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new(config: RopeConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    #[must_use]
    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Build an unlinked chain from `curve`.
    ///
    /// The chain takes a fresh id from `registry`. On failure no body is
    /// left in `backend`.
    ///
    /// # Errors
    ///
    /// Configuration and degenerate-segment errors, or a backend failure
    /// while creating bodies.
    pub fn build<B, C>(&self, backend: &mut B, registry: &mut ChainRegistry, curve: &C) -> Result<Chain>
    where
        B: PhysicsBackend + ?Sized,
        C: Curve2D + ?Sized,
    {
        self.config.validate()?;
        let plans = plan_segments(curve, self.config.segments)?;
        let id = registry.register();

        let mut segments: Vec<ChainSegment> = Vec::with_capacity(plans.len());
        for plan in &plans {
            match self.spawn(backend, plan) {
                Ok(segment) => segments.push(segment),
                Err(err) => {
                    for segment in &segments {
                        backend.remove_body(segment.body);
                    }
                    return Err(err);
                }
            }
        }

        info!(
            chain = id.raw(),
            segments = segments.len(),
            gap_ratio = self.config.gap_ratio,
            "built chain"
        );
        Ok(Chain::new(id, segments, curve.endpoint_gap(), self.config.offset))
    }

    fn spawn<B>(&self, backend: &mut B, plan: &SegmentPlan) -> Result<ChainSegment>
    where
        B: PhysicsBackend + ?Sized,
    {
        let dist = plan.length();
        let shape = Shape::Rect {
            width: self.config.body_length(dist),
            height: self.config.thickness,
        };
        let body: BodyId = backend.add_dynamic_body(shape, self.config.material, plan.pose())?;
        debug!(segment = plan.index, body = body.raw(), sign = plan.sign, "spawned segment");
        Ok(ChainSegment {
            index: plan.index,
            body,
            half_length: dist / 2.0,
            thickness: self.config.thickness,
            sign: plan.sign,
            gap_ratio: self.config.gap_ratio,
        })
    }
}
