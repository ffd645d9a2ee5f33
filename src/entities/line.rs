//! Line entity

use super::{Curve, Entity, EntityCommon};
use crate::error::{CadError, Result};
use crate::types::Vector3;

/// A line entity defined by two endpoints
#[derive(Debug, Clone)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point of the line
    pub start: Vector3,
    /// End point of the line
    pub end: Vector3,
    /// Normal vector
    pub normal: Vector3,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Create a new line from coordinates
    pub fn from_coords(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Line::from_points(Vector3::new(x1, y1, z1), Vector3::new(x2, y2, z2))
    }

    /// Get the direction vector (normalized)
    pub fn direction(&self) -> Vector3 {
        (self.end - self.start).normalize()
    }

    /// Get the midpoint of the line
    pub fn midpoint(&self) -> Vector3 {
        Vector3::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
            (self.start.z + self.end.z) / 2.0,
        )
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Line {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbLine"
    }
}

impl Curve for Line {
    fn closest_point_to(&self, point: Vector3) -> Result<Vector3> {
        let dir = self.end - self.start;
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return Err(CadError::InvalidArgument(
                "zero-length line has no closest point".to_string(),
            ));
        }
        let t = (point - self.start).dot(&dir) / len_sq;
        let t = t.clamp(0.0, 1.0);
        Ok(self.start + dir * t)
    }

    fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}
