//! Curve trait for linear and curved entities

use crate::entities::Entity;
use crate::error::Result;
use crate::types::{Tolerance, Vector3};

/// Trait for entities with a curve geometry
pub trait Curve: Entity {
    /// Closest point on the curve to the given point
    ///
    /// Fails with [`CadError::InvalidArgument`](crate::CadError::InvalidArgument)
    /// for degenerate geometry (e.g. a zero-length line).
    fn closest_point_to(&self, point: Vector3) -> Result<Vector3>;

    /// Length of the curve; `f64::INFINITY` for unbounded curves
    fn length(&self) -> f64;

    /// Check whether a point lies on the curve within the tolerance
    ///
    /// Geometry failures are treated as "not on the curve" rather than
    /// propagated, so this never fails.
    fn contains_point(&self, point: Vector3, tolerance: Tolerance) -> bool {
        match self.closest_point_to(point) {
            Ok(closest) => closest.distance(&point) <= tolerance.equal_point,
            Err(_) => false,
        }
    }
}
