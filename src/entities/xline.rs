//! XLine entity - infinite construction line

use crate::entities::{Curve, Entity, EntityCommon};
use crate::error::{CadError, Result};
use crate::types::Vector3;

/// XLine entity - a line extending infinitely in both directions
#[derive(Debug, Clone, PartialEq)]
pub struct XLine {
    /// Common entity properties
    pub common: EntityCommon,
    /// A point on the line
    pub base_point: Vector3,
    /// Direction vector (unit vector)
    pub direction: Vector3,
}

impl XLine {
    /// Create a new construction line through a point
    ///
    /// The direction vector will be normalized automatically.
    pub fn new(base_point: Vector3, direction: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            base_point,
            direction: direction.normalize(),
        }
    }

    /// Create a construction line through two points
    pub fn from_points(first: Vector3, second: Vector3) -> Self {
        Self::new(first, second - first)
    }

    /// Get a point on the line at parameter t
    pub fn point_at(&self, t: f64) -> Vector3 {
        self.base_point + self.direction * t
    }
}

impl Default for XLine {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_X)
    }
}

impl Entity for XLine {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbXline"
    }
}

impl Curve for XLine {
    fn closest_point_to(&self, point: Vector3) -> Result<Vector3> {
        if self.direction.length_squared() == 0.0 {
            return Err(CadError::InvalidArgument(
                "construction line has no direction".to_string(),
            ));
        }
        let t = (point - self.base_point).dot(&self.direction);
        Ok(self.point_at(t))
    }

    fn length(&self) -> f64 {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tolerance;

    #[test]
    fn test_xline_closest_point() {
        let xline = XLine::default();

        // Both directions are reachable, unlike a ray
        let closest = xline.closest_point_to(Vector3::new(-5.0, 3.0, 0.0)).unwrap();
        assert_eq!(closest, Vector3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_xline_length_is_unbounded() {
        assert!(XLine::default().length().is_infinite());
    }

    #[test]
    fn test_xline_contains_point() {
        let xline = XLine::default();
        assert!(xline.contains_point(Vector3::new(-100.0, 0.0, 0.0), Tolerance::GLOBAL));
        assert!(!xline.contains_point(Vector3::new(0.0, 0.5, 0.0), Tolerance::GLOBAL));
    }
}
