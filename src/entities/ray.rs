//! Ray entity - semi-infinite line starting from a point

use crate::entities::{Curve, Entity, EntityCommon};
use crate::error::{CadError, Result};
use crate::types::Vector3;

/// Ray entity - a semi-infinite line extending from a base point
///
/// A ray has a starting point (`base_point`) and extends infinitely in
/// the direction of its unit direction vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    /// Common entity properties
    pub common: EntityCommon,
    /// Base point (starting point of the ray)
    pub base_point: Vector3,
    /// Direction vector (unit vector)
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray from a base point and direction
    ///
    /// The direction vector will be normalized automatically.
    pub fn new(base_point: Vector3, direction: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            base_point,
            direction: direction.normalize(),
        }
    }

    /// Create a ray from a start point through another point
    pub fn from_points(start: Vector3, through: Vector3) -> Self {
        Self::new(start, through - start)
    }

    /// Create a ray along the X axis from a point
    pub fn along_x(base_point: Vector3) -> Self {
        Self::new(base_point, Vector3::UNIT_X)
    }

    /// Get a point on the ray at parameter t (t >= 0)
    pub fn point_at(&self, t: f64) -> Vector3 {
        self.base_point + self.direction * t.max(0.0)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_X)
    }
}

impl Entity for Ray {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbRay"
    }
}

impl Curve for Ray {
    fn closest_point_to(&self, point: Vector3) -> Result<Vector3> {
        if self.direction.length_squared() == 0.0 {
            return Err(CadError::InvalidArgument(
                "ray has no direction".to_string(),
            ));
        }
        let t = (point - self.base_point).dot(&self.direction).max(0.0);
        Ok(self.point_at(t))
    }

    fn length(&self) -> f64 {
        f64::INFINITY
    }
}
