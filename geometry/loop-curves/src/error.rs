//! Error types for curve operations.

use thiserror::Error;

/// Errors that can occur during curve operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Insufficient points to define the curve.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Parameter interval is empty, reversed or not finite.
    #[error("invalid parameter domain [{start}, {end}]")]
    InvalidDomain {
        /// Start of the interval.
        start: f64,
        /// End of the interval.
        end: f64,
    },

    /// Knot sequence of an interpolating spline is not strictly increasing.
    #[error("invalid knot sequence: {reason}")]
    InvalidKnots {
        /// Description of what's wrong with the knots.
        reason: String,
    },

    /// Consecutive curves do not meet, so they cannot be concatenated.
    #[error("curves cannot be joined: gap of {gap} after part {index}")]
    CannotJoin {
        /// Index of the part whose end does not meet the next start.
        index: usize,
        /// Distance between the end of part `index` and the start of the next.
        gap: f64,
    },

    /// Split positions for a concatenation are malformed.
    #[error("invalid splits: {reason}")]
    InvalidSplits {
        /// Description of what's wrong with the splits.
        reason: String,
    },

    /// Blend factor outside `[0, 1]`.
    #[error("blend factor {0} is outside valid range [0, 1]")]
    InvalidAlpha(f64),

    /// Loop notation contains an unknown token.
    #[error("invalid loop notation {notation:?}: {reason}")]
    InvalidNotation {
        /// The notation that failed to parse.
        notation: String,
        /// Description of the problem.
        reason: String,
    },

    /// Degenerate curve (e.g., zero length).
    #[error("degenerate curve: {reason}")]
    Degenerate {
        /// Description of the degeneracy.
        reason: String,
    },

    /// Numerical computation failed.
    #[error("numerical computation failed: {reason}")]
    NumericalError {
        /// Description of the numerical issue.
        reason: String,
    },
}

impl CurveError {
    /// Create an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, actual: usize) -> Self {
        Self::InsufficientPoints { required, actual }
    }

    /// Create an invalid knots error.
    #[must_use]
    pub fn invalid_knots(reason: impl Into<String>) -> Self {
        Self::InvalidKnots {
            reason: reason.into(),
        }
    }

    /// Create an invalid splits error.
    #[must_use]
    pub fn invalid_splits(reason: impl Into<String>) -> Self {
        Self::InvalidSplits {
            reason: reason.into(),
        }
    }

    /// Create an invalid notation error.
    #[must_use]
    pub fn invalid_notation(notation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNotation {
            notation: notation.into(),
            reason: reason.into(),
        }
    }

    /// Create a degenerate curve error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// Create a numerical error.
    #[must_use]
    pub fn numerical(reason: impl Into<String>) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Check if this is an insufficient points error.
    #[must_use]
    pub fn is_insufficient_points(&self) -> bool {
        matches!(self, Self::InsufficientPoints { .. })
    }

    /// Check if this error comes from a spline fit that could not be solved.
    ///
    /// Callers rendering live data use this to fall back to a polyline.
    #[must_use]
    pub fn is_fit_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidKnots { .. }
                | Self::NumericalError { .. }
                | Self::InsufficientPoints { .. }
                | Self::Degenerate { .. }
        )
    }

    /// Check if this is a join error.
    #[must_use]
    pub fn is_cannot_join(&self) -> bool {
        matches!(self, Self::CannotJoin { .. })
    }
}
