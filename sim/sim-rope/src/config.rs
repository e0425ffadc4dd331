//! Rope construction settings.

use sim_planar_types::Material;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, RopeError};

/// Default appended-knot offset for closed-loop spline fits.
pub const DEFAULT_OFFSET: f64 = 1e-3;

/// How a curve is turned into a chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RopeConfig {
    /// Number of rigid segments.
    pub segments: usize,
    /// Segment thickness.
    pub thickness: f64,
    /// Fraction of each sample span occupied by its segment, in `(0, 1]`.
    pub gap_ratio: f64,
    /// Joint the last segment back to the first.
    pub close_loop: bool,
    /// Let segments of the same chain collide with each other.
    pub self_intersect: bool,
    /// Offset of the closing knot used when reconstructing the curve.
    pub offset: f64,
    /// Material shared by every segment.
    pub material: Material,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            segments: 30,
            thickness: 0.01,
            gap_ratio: 1.0,
            close_loop: false,
            self_intersect: false,
            offset: DEFAULT_OFFSET,
            material: Material::new(0.1, 0.1, 0.8),
        }
    }
}

impl RopeConfig {
    /// Closed loop with `segments` segments.
    #[must_use]
    pub fn closed_loop(segments: usize) -> Self {
        Self {
            segments,
            close_loop: true,
            ..Default::default()
        }
    }

    /// Open rope with `segments` segments.
    #[must_use]
    pub fn open(segments: usize) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    /// Coarse loop for quick previews.
    #[must_use]
    pub fn preview() -> Self {
        Self::closed_loop(20)
    }

    /// Set the segment count.
    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Set the segment thickness.
    #[must_use]
    pub fn thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the gap ratio.
    #[must_use]
    pub fn gap_ratio(mut self, gap_ratio: f64) -> Self {
        self.gap_ratio = gap_ratio;
        self
    }

    /// Request or drop loop closure.
    #[must_use]
    pub fn close_loop(mut self, close_loop: bool) -> Self {
        self.close_loop = close_loop;
        self
    }

    /// Allow the chain to collide with itself.
    #[must_use]
    pub fn self_intersecting(mut self) -> Self {
        self.self_intersect = true;
        self
    }

    /// Set the closing knot offset.
    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the segment material.
    #[must_use]
    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Length of a segment body spanning `dist` between samples.
    #[must_use]
    pub fn body_length(&self, dist: f64) -> f64 {
        (dist * (1.0 - 2.0 * (1.0 - self.gap_ratio))).max(self.thickness)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let min_segments = if self.close_loop { 3 } else { 1 };
        if self.segments < min_segments {
            return Err(RopeError::invalid_config(format!(
                "need at least {min_segments} segments, got {}",
                self.segments
            )));
        }
        if !(self.thickness > 0.0) || !self.thickness.is_finite() {
            return Err(RopeError::invalid_config(format!(
                "thickness must be positive, got {}",
                self.thickness
            )));
        }
        if !(self.gap_ratio > 0.0 && self.gap_ratio <= 1.0) {
            return Err(RopeError::invalid_config(format!(
                "gap ratio must be in (0, 1], got {}",
                self.gap_ratio
            )));
        }
        if !(self.offset > 0.0) || !self.offset.is_finite() {
            return Err(RopeError::invalid_config(format!(
                "offset must be positive, got {}",
                self.offset
            )));
        }
        self.material.validate()?;
        Ok(())
    }
}
