//! Smooth curves from live chain state.
//!
//! Segment bodies are straight and blocky. What gets drawn is a spline
//! through the joint anchors, which stay (nearly) continuous from one
//! segment to the next however the bodies rotate.
//!
//! - Closed chains: periodic spline through every segment's forward
//!   anchor, plus a closing knot at `first + (offset, offset)`.
//! - Open chains: natural spline through the first segment's backward
//!   anchor and every forward anchor.
//!
//! If the spline cannot be fitted (coincident anchors, non-finite poses),
//! the frame degrades to the anchor polyline and carries a
//! [`SplineFitDegradeWarning`] instead of failing.

use loop_curves::{ParametricCurve, Polyline2, SplineBoundary, SplineCurve};
use nalgebra::Point2;
use tracing::warn;

use crate::{Chain, ChainId, PhysicsBackend, Result, RopeError, SplineFitDegradeWarning};

/// One frame's curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// The curve to draw.
    pub curve: ParametricCurve,
    /// Set when the spline fit failed and `curve` is the raw polyline.
    pub warning: Option<SplineFitDegradeWarning>,
}

impl Reconstruction {
    /// Whether this frame fell back to a polyline.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Rebuilds a chain's curve from body poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveReconstructor;

impl CurveReconstructor {
    /// World-space knots of the chain's curve, in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::MissingBody`] if a segment body is gone.
    pub fn anchor_points<B>(backend: &B, chain: &Chain) -> Result<Vec<Point2<f64>>>
    where
        B: PhysicsBackend + ?Sized,
    {
        let mut points = Vec::with_capacity(chain.len() + 1);
        if !chain.is_closed() {
            if let Some(first) = chain.segments().first() {
                points.push(world_anchor(backend, first.body, &first.backward_anchor())?);
            }
        }
        for segment in chain.segments() {
            points.push(world_anchor(backend, segment.body, &segment.forward_anchor())?);
        }
        Ok(points)
    }

    /// Fit the chain's current curve.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::MissingBody`] if a segment body is gone. Fit
    /// failures are not errors; see [`Reconstruction::warning`].
    pub fn reconstruct<B>(backend: &B, chain: &Chain) -> Result<Reconstruction>
    where
        B: PhysicsBackend + ?Sized,
    {
        let points = Self::anchor_points(backend, chain)?;
        Self::fit(chain.id(), &points, chain.is_closed(), chain.offset())
    }

    /// Fit a curve through anchor points, degrading to a polyline.
    ///
    /// # Errors
    ///
    /// Only when not even a polyline can be formed (fewer than two points).
    pub fn fit(
        chain: ChainId,
        points: &[Point2<f64>],
        closed: bool,
        offset: f64,
    ) -> Result<Reconstruction> {
        let fitted = if closed {
            SplineCurve::periodic_loop(points, offset)
        } else {
            SplineCurve::fit(points, SplineBoundary::Natural)
        };

        match fitted {
            Ok(spline) => Ok(Reconstruction {
                curve: ParametricCurve::Spline(spline),
                warning: None,
            }),
            Err(cause) => {
                let polyline = if closed {
                    Polyline2::closed(points.to_vec())
                } else {
                    Polyline2::try_new(points.to_vec())
                }?;
                let warning = SplineFitDegradeWarning {
                    chain,
                    anchors: points.len(),
                    cause,
                };
                warn!(chain = chain.raw(), anchors = points.len(), cause = %warning.cause, "spline fit degraded to polyline");
                Ok(Reconstruction {
                    curve: ParametricCurve::Sampled(polyline),
                    warning: Some(warning),
                })
            }
        }
    }
}

fn world_anchor<B>(backend: &B, body: sim_planar_types::BodyId, local: &Point2<f64>) -> Result<Point2<f64>>
where
    B: PhysicsBackend + ?Sized,
{
    backend
        .pose(body)
        .map(|pose| pose.transform_point(local))
        .ok_or(RopeError::missing_body(body))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{plan_segments, ChainBuilder, ChainRegistry, JointLinker, RopeConfig};
    use approx::assert_relative_eq;
    use loop_curves::{AnalyticCurve, Curve2D};
    use sim_planar::World;
    use sim_planar_types::SimulationConfig;

    fn spawn(world: &mut World, config: RopeConfig, curve: &AnalyticCurve) -> Chain {
        let close = config.close_loop;
        let mut chain = ChainBuilder::new(config)
            .build(world, &mut ChainRegistry::new(), curve)
            .unwrap();
        JointLinker::new(close).link(world, &mut chain).unwrap();
        chain
    }

    #[test]
    fn test_closed_chain_at_rest_passes_through_samples() {
        let mut world = World::new(SimulationConfig::default());
        let curve = AnalyticCurve::circle(Point2::new(1.0, 1.0), 1.5, 0.3);
        let chain = spawn(&mut world, RopeConfig::closed_loop(12), &curve);

        let reconstruction = CurveReconstructor::reconstruct(&world, &chain).unwrap();
        assert!(!reconstruction.is_degraded());
        let ParametricCurve::Spline(spline) = &reconstruction.curve else {
            panic!("expected a spline, got {}", reconstruction.curve.kind());
        };

        let plans = plan_segments(&curve, 12).unwrap();
        for (plan, knot) in plans.iter().zip(spline.knots()) {
            let p = spline.point_at(*knot);
            assert_relative_eq!((p - plan.end).norm(), 0.0, epsilon = 1e-9);
        }
        assert!(reconstruction.curve.is_loop_closed());
    }

    #[test]
    fn test_open_chain_includes_first_sample() {
        let mut world = World::new(SimulationConfig::default());
        let curve = AnalyticCurve::segment(Point2::new(0.0, 0.0), Point2::new(3.0, 3.0));
        let chain = spawn(&mut world, RopeConfig::open(3), &curve);

        let anchors = CurveReconstructor::anchor_points(&world, &chain).unwrap();
        assert_eq!(anchors.len(), 4);
        assert_relative_eq!(anchors[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(anchors[3].y, 3.0, epsilon = 1e-12);

        let curve = CurveReconstructor::reconstruct(&world, &chain).unwrap().curve;
        assert_relative_eq!(curve.start().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(curve.end().x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_anchors_degrade_to_polyline() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let reconstruction =
            CurveReconstructor::fit(ChainId::new(5), &points, true, 1e-3).unwrap();
        assert!(reconstruction.is_degraded());
        assert_eq!(reconstruction.curve.kind(), "sampled");
        let warning = reconstruction.warning.unwrap();
        assert_eq!(warning.chain, ChainId::new(5));
        assert!(warning.cause.is_fit_failure());
    }

    #[test]
    fn test_too_few_points_is_an_error() {
        assert!(CurveReconstructor::fit(ChainId::new(1), &[Point2::origin()], false, 1e-3).is_err());
    }

    #[test]
    fn test_missing_segment_body() {
        let mut world = World::new(SimulationConfig::default());
        let curve = AnalyticCurve::circle(Point2::origin(), 1.0, 0.0);
        let chain = spawn(&mut world, RopeConfig::closed_loop(6), &curve);
        world.remove_body(chain.segments()[2].body);
        assert!(matches!(
            CurveReconstructor::reconstruct(&world, &chain),
            Err(RopeError::MissingBody { .. })
        ));
    }
}
