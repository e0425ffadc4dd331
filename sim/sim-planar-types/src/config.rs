//! Configuration types for simulation.
//!
//! This module provides the settings that control how a planar world steps:
//! timestep, gravity, damping and solver effort.

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// Main configuration for a planar simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed timestep for one frame (seconds).
    pub timestep: f64,
    /// Gravitational acceleration.
    pub gravity: Vector2<f64>,
    /// Fraction of velocity kept per second; `1.0` means no damping.
    pub damping: f64,
    /// Sub-steps per frame.
    pub substeps: usize,
    /// Constraint iterations per sub-step.
    pub iterations: usize,
    /// Whether shapes generate contacts.
    pub enable_contacts: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            gravity: Vector2::zeros(),
            damping: 1.0,
            substeps: 8,
            iterations: 4,
            enable_contacts: true,
        }
    }
}

impl SimulationConfig {
    /// Create a config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Real-time rendering (60 Hz), the default.
    #[must_use]
    pub fn realtime() -> Self {
        Self::default()
    }

    /// Stiffer joints at a higher cost per frame.
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self {
            substeps: 20,
            iterations: 8,
            ..Default::default()
        }
    }

    /// Cheap, visibly softer joints.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            timestep: 1.0 / 30.0,
            substeps: 4,
            iterations: 2,
            ..Default::default()
        }
    }

    /// Set the gravity vector.
    #[must_use]
    pub fn gravity(mut self, gravity: Vector2<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Downward gravity of magnitude `g`.
    #[must_use]
    pub fn with_gravity(self, g: f64) -> Self {
        self.gravity(Vector2::new(0.0, -g))
    }

    /// Set velocity damping.
    #[must_use]
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set solver effort.
    #[must_use]
    pub fn solver(mut self, substeps: usize, iterations: usize) -> Self {
        self.substeps = substeps;
        self.iterations = iterations;
        self
    }

    /// Disable contact generation.
    #[must_use]
    pub fn without_contacts(mut self) -> Self {
        self.enable_contacts = false;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SimError::InvalidTimestep(self.timestep));
        }
        if self.timestep > 1.0 {
            return Err(SimError::invalid_config(
                "timestep > 1 second is likely an error",
            ));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(SimError::invalid_config("gravity must be finite"));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SimError::invalid_config(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        if self.substeps == 0 || self.iterations == 0 {
            return Err(SimError::invalid_config(
                "substeps and iterations must be at least 1",
            ));
        }
        Ok(())
    }

    /// Get the frame frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }
}
