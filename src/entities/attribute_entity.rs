//! Attribute entity - block attribute instance with actual values

use crate::entities::attribute_definition::{
    AttributeDefinition, AttributeFlags, HorizontalAlignment, MTextFlag, TextGenerationFlags,
    VerticalAlignment,
};
use crate::entities::{Entity, EntityCommon};
use crate::types::{Handle, Vector3};
use std::f64::consts::PI;

/// Attribute entity - contains the actual value for a block attribute
///
/// Attribute entities hang off block reference instances. Each one
/// corresponds to a non-constant attribute definition in the referenced
/// block and carries the per-instance value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntity {
    /// Common entity properties
    pub common: EntityCommon,
    /// Attribute tag (matches the definition's tag)
    pub tag: String,
    /// Actual attribute value
    pub value: String,
    /// Text insertion point, in world coordinates
    pub insertion_point: Vector3,
    /// Second alignment point (for non-left alignments)
    pub alignment_point: Vector3,
    /// Text height
    pub height: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    /// Relative X scale factor (width factor)
    pub width_factor: f64,
    /// Oblique angle in radians
    pub oblique_angle: f64,
    /// Text style name
    pub text_style: String,
    /// Text generation flags
    pub text_generation_flags: TextGenerationFlags,
    /// Horizontal alignment
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
    /// Attribute flags
    pub flags: AttributeFlags,
    /// Field length
    pub field_length: i16,
    /// Extrusion direction
    pub normal: Vector3,
    /// Multiline text flag
    pub mtext_flag: MTextFlag,
    /// Handle of the attribute definition this was created from
    pub attdef_handle: Handle,
    /// Lock position in block
    pub lock_position: bool,
}

impl AttributeEntity {
    /// Create a new attribute with tag and value
    pub fn new(tag: String, value: String) -> Self {
        Self {
            common: EntityCommon::default(),
            tag,
            value,
            insertion_point: Vector3::ZERO,
            alignment_point: Vector3::ZERO,
            height: 2.5,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            text_style: "STANDARD".to_string(),
            text_generation_flags: TextGenerationFlags::empty(),
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Baseline,
            flags: AttributeFlags::default(),
            field_length: 0,
            normal: Vector3::UNIT_Z,
            mtext_flag: MTextFlag::SingleLine,
            attdef_handle: Handle::NULL,
            lock_position: false,
        }
    }

    /// Create a simple attribute with just tag and value
    pub fn simple(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(tag.into(), value.into())
    }

    /// Create an attribute from an attribute definition
    ///
    /// The value defaults to the definition's default value when `value`
    /// is `None`. Position is copied in block-local coordinates; call
    /// [`apply_insert_transform`](Self::apply_insert_transform) to move it
    /// into world coordinates for a particular block reference.
    pub fn from_definition(attdef: &AttributeDefinition, value: Option<String>) -> Self {
        Self {
            common: EntityCommon {
                layer: attdef.common.layer.clone(),
                color: attdef.common.color,
                ..Default::default()
            },
            tag: attdef.tag.clone(),
            value: value.unwrap_or_else(|| attdef.default_value.clone()),
            insertion_point: attdef.insertion_point,
            alignment_point: attdef.alignment_point,
            height: attdef.height,
            rotation: attdef.rotation,
            width_factor: attdef.width_factor,
            oblique_angle: attdef.oblique_angle,
            text_style: attdef.text_style.clone(),
            text_generation_flags: attdef.text_generation_flags,
            horizontal_alignment: attdef.horizontal_alignment,
            vertical_alignment: attdef.vertical_alignment,
            flags: attdef.flags,
            field_length: attdef.field_length,
            normal: attdef.normal,
            mtext_flag: attdef.mtext_flag,
            attdef_handle: attdef.common.handle,
            lock_position: attdef.lock_position,
        }
    }

    /// Set the attribute value
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Get the attribute value
    pub fn get_value(&self) -> &str {
        &self.value
    }

    /// Set the rotation angle in degrees
    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        self.rotation = degrees * PI / 180.0;
    }

    /// Get the rotation angle in degrees
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation * 180.0 / PI
    }

    /// Check if this is a constant attribute
    pub fn is_constant(&self) -> bool {
        self.flags.constant
    }

    /// Apply the placement of a block reference to this attribute
    ///
    /// Takes block-local anchor points and moves them to world
    /// coordinates: scale, rotate around the block origin, then translate
    /// to the insertion point.
    pub fn apply_insert_transform(
        &mut self,
        insert_point: Vector3,
        scale: Vector3,
        rotation: f64,
    ) {
        let cos_r = rotation.cos();
        let sin_r = rotation.sin();

        let place = |p: Vector3| {
            let scaled = Vector3::new(p.x * scale.x, p.y * scale.y, p.z * scale.z);
            let rotated = Vector3::new(
                scaled.x * cos_r - scaled.y * sin_r,
                scaled.x * sin_r + scaled.y * cos_r,
                scaled.z,
            );
            rotated + insert_point
        };

        self.insertion_point = place(self.insertion_point);
        self.alignment_point = place(self.alignment_point);
        self.rotation += rotation;

        // Average of X and Y scale keeps the text uniform
        let text_scale = (scale.x.abs() + scale.y.abs()) / 2.0;
        self.height *= text_scale;
    }

    /// Builder: Set value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Builder: Set layer
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.common.layer = layer.into();
        self
    }
}

impl Default for AttributeEntity {
    fn default() -> Self {
        Self::new("ATTRIBUTE".to_string(), String::new())
    }
}

impl Entity for AttributeEntity {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbAttribute"
    }

    fn is_invisible(&self) -> bool {
        self.common.invisible || self.flags.invisible
    }
}
