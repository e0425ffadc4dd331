//! Rigid body state types.
//!
//! Planar bodies have three degrees of freedom: position in the plane and a
//! rotation angle about the out-of-plane axis.

use nalgebra::{Isometry2, Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// Unique identifier for a rigid body in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Position and orientation of a body in the plane.
///
/// # Example
///
/// ```
/// use sim_planar_types::Pose2;
/// use nalgebra::Point2;
///
/// let pose = Pose2::new(Point2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
/// let world = pose.transform_point(&Point2::new(1.0, 0.0));
/// assert!((world.x - 1.0).abs() < 1e-12);
/// assert!((world.y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose2 {
    /// Position in world coordinates.
    pub position: Point2<f64>,
    /// Rotation angle in radians, counter-clockwise.
    pub angle: f64,
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose2 {
    /// Create a pose from position and angle.
    #[must_use]
    pub const fn new(position: Point2<f64>, angle: f64) -> Self {
        Self { position, angle }
    }

    /// Identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point2::origin(), 0.0)
    }

    /// Create a pose from position only.
    #[must_use]
    pub fn from_position(position: Point2<f64>) -> Self {
        Self::new(position, 0.0)
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(self.position.coords, self.angle)
    }

    /// Transform a point from local to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point2<f64>) -> Point2<f64> {
        self.to_isometry() * local
    }

    /// Rotate a vector from local to world coordinates.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector2<f64>) -> Vector2<f64> {
        self.to_isometry() * local
    }

    /// Transform a point from world to local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point2<f64>) -> Point2<f64> {
        self.to_isometry().inverse_transform_point(world)
    }

    /// Local +x axis in world coordinates.
    #[must_use]
    pub fn axis(&self) -> Vector2<f64> {
        Vector2::new(self.angle.cos(), self.angle.sin())
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite() && self.angle.is_finite()
    }
}

/// Linear and angular velocity of a planar body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity2 {
    /// Linear velocity in world coordinates.
    pub linear: Vector2<f64>,
    /// Angular velocity (rad/s), counter-clockwise.
    pub angular: f64,
}

impl Default for Velocity2 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Velocity2 {
    /// Create a velocity.
    #[must_use]
    pub const fn new(linear: Vector2<f64>, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// At rest.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Vector2::zeros(), 0.0)
    }

    /// Velocity of a point at world offset `r` from the center of mass.
    ///
    /// `v_point = v + ω × r`
    #[must_use]
    pub fn velocity_at_offset(&self, r: &Vector2<f64>) -> Vector2<f64> {
        self.linear + Vector2::new(-r.y, r.x) * self.angular
    }

    /// Linear speed.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.linear.norm()
    }

    /// Check if the velocity contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.iter().all(|v| v.is_finite()) && self.angular.is_finite()
    }
}

/// Mass and moment of inertia about the center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties2 {
    /// Total mass.
    pub mass: f64,
    /// Moment of inertia about the out-of-plane axis.
    pub inertia: f64,
}

impl MassProperties2 {
    /// Create mass properties.
    #[must_use]
    pub const fn new(mass: f64, inertia: f64) -> Self {
        Self { mass, inertia }
    }

    /// Uniform box of the given size: `I = m (w² + h²) / 12`.
    #[must_use]
    pub fn rect(mass: f64, width: f64, height: f64) -> Self {
        Self::new(mass, mass * (width * width + height * height) / 12.0)
    }

    /// Uniform disc: `I = m r² / 2`.
    #[must_use]
    pub fn circle(mass: f64, radius: f64) -> Self {
        Self::new(mass, 0.5 * mass * radius * radius)
    }

    /// Infinite mass; the body does not respond to forces or constraints.
    #[must_use]
    pub fn immovable() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY)
    }

    /// Inverse mass (0 for static bodies).
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Inverse inertia (0 for static bodies or zero inertia).
    #[must_use]
    pub fn inverse_inertia(&self) -> f64 {
        if self.inertia <= 0.0 || self.inertia.is_infinite() {
            0.0
        } else {
            1.0 / self.inertia
        }
    }

    /// Check if this represents an immovable body.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0 || self.mass.is_infinite()
    }

    /// Validate that the mass properties are physically valid.
    pub fn validate(&self) -> Result<()> {
        if self.mass.is_nan() || self.mass < 0.0 {
            return Err(SimError::invalid_mass(format!(
                "mass must be non-negative, got {}",
                self.mass
            )));
        }
        if self.inertia.is_nan() || self.inertia < 0.0 {
            return Err(SimError::invalid_mass(format!(
                "inertia must be non-negative, got {}",
                self.inertia
            )));
        }
        Ok(())
    }
}

/// Surface and bulk material of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Mass per unit area.
    pub density: f64,
    /// Coefficient of restitution in `[0, 1]`.
    pub elasticity: f64,
    /// Coulomb friction coefficient.
    pub friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            elasticity: 0.0,
            friction: 0.5,
        }
    }
}

impl Material {
    /// Create a material.
    #[must_use]
    pub const fn new(density: f64, elasticity: f64, friction: f64) -> Self {
        Self {
            density,
            elasticity,
            friction,
        }
    }

    /// Validate ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.density > 0.0) || !self.density.is_finite() {
            return Err(SimError::invalid_config(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if !(0.0..=1.0).contains(&self.elasticity) {
            return Err(SimError::invalid_config(format!(
                "elasticity must be in [0, 1], got {}",
                self.elasticity
            )));
        }
        if !(self.friction >= 0.0) || !self.friction.is_finite() {
            return Err(SimError::invalid_config(format!(
                "friction must be non-negative, got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyKind {
    /// Moves under forces, gravity and constraints.
    #[default]
    Dynamic,
    /// Never moves; other bodies collide with and attach to it.
    Static,
}

/// Collision geometry of a body, in local coordinates centered on the body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Disc.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Rectangle along the local x axis.
    ///
    /// For contacts the rectangle is treated as a capsule: a segment of
    /// length `width - height` swept by a disc of radius `height / 2`.
    Rect {
        /// Extent along local x.
        width: f64,
        /// Extent along local y.
        height: f64,
    },
}

impl Shape {
    /// Area of the shape.
    #[must_use]
    pub fn area(&self) -> f64 {
        match *self {
            Self::Circle { radius } => std::f64::consts::PI * radius * radius,
            Self::Rect { width, height } => width * height,
        }
    }

    /// Mass properties for a uniform density.
    #[must_use]
    pub fn mass_properties(&self, density: f64) -> MassProperties2 {
        let mass = self.area() * density;
        match *self {
            Self::Circle { radius } => MassProperties2::circle(mass, radius),
            Self::Rect { width, height } => MassProperties2::rect(mass, width, height),
        }
    }

    /// Half-length of the core segment and the sweep radius.
    ///
    /// A circle is a capsule with a zero-length core.
    #[must_use]
    pub fn capsule(&self) -> (f64, f64) {
        match *self {
            Self::Circle { radius } => (0.0, radius),
            Self::Rect { width, height } => {
                let radius = 0.5 * height;
                ((0.5 * width - radius).max(0.0), radius)
            }
        }
    }

    /// Validate dimensions.
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Circle { radius } => radius > 0.0 && radius.is_finite(),
            Self::Rect { width, height } => {
                width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SimError::invalid_config(format!("invalid shape {self:?}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pose_round_trip() {
        let pose = Pose2::new(Point2::new(2.0, -1.0), 0.7);
        let local = Point2::new(0.3, 0.4);
        let back = pose.inverse_transform_point(&pose.transform_point(&local));
        assert_relative_eq!(back.x, local.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, local.y, epsilon = 1e-12);
    }

    #[test]
    fn test_pose_axis() {
        let pose = Pose2::new(Point2::origin(), FRAC_PI_2);
        assert_relative_eq!(pose.axis().y, 1.0, epsilon = 1e-12);
        let v = pose.transform_vector(&Vector2::new(1.0, 0.0));
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_at_offset() {
        let v = Velocity2::new(Vector2::new(1.0, 0.0), 2.0);
        let p = v.velocity_at_offset(&Vector2::new(0.0, 1.0));
        assert_relative_eq!(p.x, -1.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn test_shape_mass() {
        let rect = Shape::Rect {
            width: 2.0,
            height: 1.0,
        };
        let props = rect.mass_properties(0.5);
        assert_relative_eq!(props.mass, 1.0);
        assert_relative_eq!(props.inertia, 5.0 / 12.0);

        let disc = Shape::Circle { radius: 2.0 };
        let props = disc.mass_properties(1.0);
        assert_relative_eq!(props.inertia, 0.5 * props.mass * 4.0);
    }

    #[test]
    fn test_capsule() {
        let (half, radius) = Shape::Rect {
            width: 1.0,
            height: 0.2,
        }
        .capsule();
        assert_relative_eq!(half, 0.4);
        assert_relative_eq!(radius, 0.1);

        // Thicker than long: degenerates to a disc.
        let (half, _) = Shape::Rect {
            width: 0.1,
            height: 0.2,
        }
        .capsule();
        assert_eq!(half, 0.0);
    }

    #[test]
    fn test_static_mass() {
        let m = MassProperties2::immovable();
        assert!(m.is_static());
        assert_eq!(m.inverse_mass(), 0.0);
        assert_eq!(m.inverse_inertia(), 0.0);
        assert!(MassProperties2::new(-1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_material_validation() {
        assert!(Material::default().validate().is_ok());
        assert!(Material::new(0.0, 0.1, 0.8).validate().is_err());
        assert!(Material::new(1.0, 1.5, 0.8).validate().is_err());
        assert!(Material::new(1.0, 0.5, -0.1).validate().is_err());
    }
}
