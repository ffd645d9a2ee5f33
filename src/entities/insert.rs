//! Insert entity (block reference)

use crate::entities::{Entity, EntityCommon};
use crate::types::{Handle, Vector3};

/// Insert entity - a reference to a block definition
///
/// An Insert places an instance of a block at a specified location with
/// optional scaling and rotation. When the referenced block defines
/// attributes, the instance owns one attribute entity per non-constant
/// definition.
///
/// A dynamic block reference points at an anonymous representation
/// record (`block_record`) while `dynamic_block_record` retains the
/// named source definition. For plain references
/// `dynamic_block_record` is null.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Block name as captured at reference creation time
    pub block_name: String,
    /// Handle of the referenced block record
    pub block_record: Handle,
    /// Handle of the named source definition for dynamic references
    pub dynamic_block_record: Handle,
    /// Handles of the owned attribute entities
    pub attributes: Vec<Handle>,
    /// Insertion point (in WCS)
    pub insert_point: Vector3,
    /// X scale factor
    pub x_scale: f64,
    /// Y scale factor
    pub y_scale: f64,
    /// Z scale factor
    pub z_scale: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    /// Normal vector (extrusion direction)
    pub normal: Vector3,
}

impl Insert {
    /// Create a new insert entity
    pub fn new(block_name: impl Into<String>, insert_point: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: block_name.into(),
            block_record: Handle::NULL,
            dynamic_block_record: Handle::NULL,
            attributes: Vec::new(),
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Builder: Set the scale factors
    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_scale = x;
        self.y_scale = y;
        self.z_scale = z;
        self
    }

    /// Builder: Set uniform scale
    pub fn with_uniform_scale(mut self, scale: f64) -> Self {
        self.x_scale = scale;
        self.y_scale = scale;
        self.z_scale = scale;
        self
    }

    /// Builder: Set the rotation angle
    pub fn with_rotation(mut self, angle: f64) -> Self {
        self.rotation = angle;
        self
    }

    /// Check whether this is a dynamic block reference
    pub fn is_dynamic(&self) -> bool {
        self.dynamic_block_record.is_valid()
    }

    /// Scale factors as a vector
    pub fn scale(&self) -> Vector3 {
        Vector3::new(self.x_scale, self.y_scale, self.z_scale)
    }

    /// Check if the insert has uniform scale
    pub fn has_uniform_scale(&self) -> bool {
        (self.x_scale - self.y_scale).abs() < 1e-10 && (self.y_scale - self.z_scale).abs() < 1e-10
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbBlockReference"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_creation() {
        let insert = Insert::new("DOOR", Vector3::new(10.0, 20.0, 0.0));
        assert_eq!(insert.block_name, "DOOR");
        assert_eq!(insert.insert_point, Vector3::new(10.0, 20.0, 0.0));
        assert!(!insert.is_dynamic());
        assert!(insert.attributes.is_empty());
    }

    #[test]
    fn test_insert_scale() {
        let insert = Insert::new("DOOR", Vector3::ZERO).with_uniform_scale(2.0);
        assert!(insert.has_uniform_scale());
        assert_eq!(insert.scale(), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_insert_dynamic() {
        let mut insert = Insert::new("*U12", Vector3::ZERO);
        insert.dynamic_block_record = Handle::new(0x50);
        assert!(insert.is_dynamic());
    }
}
