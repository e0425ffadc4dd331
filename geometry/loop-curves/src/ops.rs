//! Curve composition.
//!
//! [`concat`] joins curves end to end into one path over `[0, 1]`. Each part
//! occupies a slice of the unit interval given by its split position, and is
//! traversed over its own full domain within that slice.

use nalgebra::Point2;

use crate::{Curve2D, CurveError, Domain, ParametricCurve, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest end-to-start gap accepted between consecutive parts.
pub const JOIN_TOLERANCE: f64 = 1e-2;

/// Several curves traversed one after another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Concatenation {
    parts: Vec<ParametricCurve>,
    /// Upper bound of each part's slice of `[0, 1]`; the last is always `1`.
    splits: Vec<f64>,
}

impl Concatenation {
    /// The joined parts.
    #[must_use]
    pub fn parts(&self) -> &[ParametricCurve] {
        &self.parts
    }

    /// Upper bound of each part's slice of `[0, 1]`.
    #[must_use]
    pub fn splits(&self) -> &[f64] {
        &self.splits
    }
}

impl Curve2D for Concatenation {
    fn domain(&self) -> Domain {
        Domain::UNIT
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        let last = self.parts.len() - 1;
        if t <= 0.0 {
            return self.parts[0].start();
        }
        if t >= 1.0 {
            return self.parts[last].end();
        }

        let nth = self.splits.iter().position(|&split| t <= split).unwrap_or(last);
        let lower = if nth == 0 { 0.0 } else { self.splits[nth - 1] };
        let local = (t - lower) / (self.splits[nth] - lower);
        self.parts[nth].point_at_normalized(local)
    }
}

/// Join curves end to end.
///
/// # Parameters
///
/// - `parts`: at least two curves; each must end within [`JOIN_TOLERANCE`]
///   of where the next one starts
/// - `splits`: interior split positions, strictly increasing in `(0, 1)`,
///   one fewer than the number of parts. `None` gives every part an equal
///   share, `i / n`.
///
/// # Errors
///
/// - [`CurveError::InsufficientPoints`] with fewer than two parts
/// - [`CurveError::CannotJoin`] if consecutive parts do not meet
/// - [`CurveError::InvalidSplits`] for malformed split positions
///
/// # Example
///
/// ```
/// use loop_curves::{concat, AnalyticCurve, Curve2D, ParametricCurve};
/// use nalgebra::Point2;
///
/// let a = AnalyticCurve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
/// let b = AnalyticCurve::segment(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0));
/// let path = concat(vec![a.into(), b.into()], None).unwrap();
///
/// assert!((path.point_at(0.5).x - 1.0).abs() < 1e-12);
/// ```
pub fn concat(parts: Vec<ParametricCurve>, splits: Option<Vec<f64>>) -> Result<ParametricCurve> {
    if parts.len() < 2 {
        return Err(CurveError::insufficient_points(2, parts.len()));
    }

    for (index, pair) in parts.windows(2).enumerate() {
        let gap = (pair[1].start() - pair[0].end()).norm();
        if !(gap < JOIN_TOLERANCE) {
            return Err(CurveError::CannotJoin { index, gap });
        }
    }

    let n = parts.len();
    let mut splits = match splits {
        Some(splits) => {
            if splits.len() != n - 1 {
                return Err(CurveError::invalid_splits(format!(
                    "expected {} splits for {} parts, got {}",
                    n - 1,
                    n,
                    splits.len()
                )));
            }
            let mut prev = 0.0;
            for &split in &splits {
                if !(split > prev) || split >= 1.0 {
                    return Err(CurveError::invalid_splits(format!(
                        "split {split} is not strictly increasing within (0, 1)"
                    )));
                }
                prev = split;
            }
            splits
        }
        None => (1..n).map(|i| i as f64 / n as f64).collect(),
    };
    splits.push(1.0);

    Ok(ParametricCurve::Concat(Concatenation { parts, splits }))
}
