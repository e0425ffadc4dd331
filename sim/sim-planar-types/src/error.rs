//! Errors raised by the planar world.

use thiserror::Error;

use crate::{BodyId, JointId};

/// Failure of a world operation.
///
/// Handles that no longer resolve, rejected parameters and a solver that
/// left the finite range are the only ways a world call can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// The body was never added or has been removed.
    #[error("{0} is not in the world")]
    UnknownBody(BodyId),

    /// The joint was never added or has been removed.
    #[error("{0} is not in the world")]
    UnknownJoint(JointId),

    /// A step length that is zero, negative or not finite.
    #[error("timestep {0} is not a positive finite number")]
    InvalidTimestep(f64),

    /// A body's pose or velocity became `NaN` or infinite during a step.
    #[error("{body} left the finite range after {steps} steps")]
    Diverged {
        /// First body found with a non-finite state.
        body: BodyId,
        /// Steps completed before the check.
        steps: u64,
    },

    /// Rejected world, body, shape or joint parameters.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Which parameter and why.
        reason: String,
    },

    /// Negative or `NaN` mass or inertia.
    #[error("invalid mass: {reason}")]
    InvalidMass {
        /// Which quantity and its value.
        reason: String,
    },
}

impl SimError {
    /// Divergence of `body` after `steps` steps.
    #[must_use]
    pub fn diverged(body: BodyId, steps: u64) -> Self {
        Self::Diverged { body, steps }
    }

    /// Rejected parameters.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Rejected mass or inertia.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMass {
            reason: reason.into(),
        }
    }

    /// Whether the world blew up; it should be rebuilt rather than stepped again.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Whether a parameter was rejected before anything changed.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::InvalidTimestep(_) | Self::InvalidMass { .. }
        )
    }

    /// Whether a body or joint handle did not resolve.
    #[must_use]
    pub fn is_missing_handle(&self) -> bool {
        matches!(self, Self::UnknownBody(_) | Self::UnknownJoint(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_handle() {
        assert_eq!(SimError::UnknownBody(BodyId(42)).to_string(), "Body(42) is not in the world");
        assert_eq!(SimError::UnknownJoint(JointId(3)).to_string(), "Joint(3) is not in the world");
        assert_eq!(
            SimError::diverged(BodyId(7), 120).to_string(),
            "Body(7) left the finite range after 120 steps"
        );
    }

    #[test]
    fn test_error_kinds() {
        let err = SimError::diverged(BodyId(1), 0);
        assert!(err.is_diverged());
        assert!(!err.is_config_error());
        assert!(!err.is_missing_handle());

        assert!(SimError::invalid_config("bad value").is_config_error());
        assert!(SimError::InvalidTimestep(-1.0).is_config_error());
        assert!(SimError::invalid_mass("mass is NaN").is_config_error());
        assert!(SimError::UnknownJoint(JointId(3)).is_missing_handle());
        assert!(SimError::UnknownBody(BodyId(3)).is_missing_handle());
    }
}
