//! AttributeDefinition entity - block attribute template

use crate::entities::{Entity, EntityCommon};
use crate::types::Vector3;
use bitflags::bitflags;
use std::f64::consts::PI;

bitflags! {
    /// Text generation flags (mirroring)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextGenerationFlags: i16 {
        /// Text is backward (mirrored in X)
        const MIRRORED_X = 2;
        /// Text is upside down (mirrored in Y)
        const MIRRORED_Y = 4;
    }
}

/// Attribute flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeFlags {
    /// Attribute is invisible
    pub invisible: bool,
    /// Attribute is constant (value cannot be changed)
    pub constant: bool,
    /// Verification required on input
    pub verify: bool,
    /// Attribute is preset (no prompt during insertion)
    pub preset: bool,
    /// Attribute may not be moved
    pub locked_position: bool,
    /// Attribute is in annotative block
    pub annotative: bool,
}

impl AttributeFlags {
    /// Create from a raw bit flag value
    pub fn from_bits(bits: i32) -> Self {
        Self {
            invisible: (bits & 1) != 0,
            constant: (bits & 2) != 0,
            verify: (bits & 4) != 0,
            preset: (bits & 8) != 0,
            locked_position: (bits & 16) != 0,
            annotative: (bits & 128) != 0,
        }
    }

    /// Convert to a raw bit flag value
    pub fn to_bits(&self) -> i32 {
        let mut bits = 0;
        if self.invisible { bits |= 1; }
        if self.constant { bits |= 2; }
        if self.verify { bits |= 4; }
        if self.preset { bits |= 8; }
        if self.locked_position { bits |= 16; }
        if self.annotative { bits |= 128; }
        bits
    }
}

/// Text horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Left alignment
    #[default]
    Left = 0,
    /// Center alignment
    Center = 1,
    /// Right alignment
    Right = 2,
    /// Aligned (fit between two points)
    Aligned = 3,
    /// Middle alignment
    Middle = 4,
    /// Fit (stretch to fit between two points)
    Fit = 5,
}

/// Text vertical alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Baseline alignment
    #[default]
    Baseline = 0,
    /// Bottom alignment
    Bottom = 1,
    /// Middle alignment
    Middle = 2,
    /// Top alignment
    Top = 3,
}

/// Multiline attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MTextFlag {
    /// Single-line attribute
    #[default]
    SingleLine = 0,
    /// Multiline attribute
    MultiLine = 2,
    /// Constant multiline attribute
    ConstantMultiLine = 4,
}

/// AttributeDefinition entity - defines a template for block attributes
///
/// Attribute definitions live inside block definitions and specify the
/// tag name, prompt, default value, and display properties for block
/// attributes. When a block is inserted, attribute entities are created
/// from these definitions. Constant definitions are display-only and
/// never produce per-instance attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    /// Common entity properties
    pub common: EntityCommon,
    /// Attribute tag (identifier)
    pub tag: String,
    /// Prompt string for user input
    pub prompt: String,
    /// Default value
    pub default_value: String,
    /// Text insertion point, in block-local coordinates
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
    /// Field length (optional)
    pub field_length: i16,
    /// Extrusion direction
    pub normal: Vector3,
    /// Multiline text flag
    pub mtext_flag: MTextFlag,
    /// Lock position in block
    pub lock_position: bool,
}

impl AttributeDefinition {
    /// Create a new attribute definition
    pub fn new(tag: String, prompt: String, default_value: String) -> Self {
        Self {
            common: EntityCommon::default(),
            tag,
            prompt,
            default_value,
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
            lock_position: false,
        }
    }

    /// Create a simple attribute definition with just a tag
    pub fn simple(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::new(tag.clone(), format!("Enter {}:", tag), String::new())
    }

    /// Create a constant attribute definition
    pub fn constant(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut attdef = Self::simple(tag);
        attdef.default_value = value.into();
        attdef.flags.constant = true;
        attdef
    }

    /// Set the text insertion point
    pub fn set_position(&mut self, point: Vector3) {
        self.insertion_point = point;
        self.alignment_point = point;
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

    /// Builder: Set position
    pub fn with_position(mut self, point: Vector3) -> Self {
        self.set_position(point);
        self
    }

    /// Builder: Set default value
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Builder: Set height
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Builder: Set text style
    pub fn with_text_style(mut self, style: impl Into<String>) -> Self {
        self.text_style = style.into();
        self
    }

    /// Builder: Set invisible
    pub fn with_invisible(mut self) -> Self {
        self.flags.invisible = true;
        self
    }

    /// Builder: Set constant
    pub fn with_constant(mut self) -> Self {
        self.flags.constant = true;
        self
    }

    /// Builder: Set layer
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.common.layer = layer.into();
        self
    }
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self::simple("ATTRIBUTE")
    }
}

impl Entity for AttributeDefinition {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn class_name(&self) -> &'static str {
        "AcDbAttributeDefinition"
    }

    fn is_invisible(&self) -> bool {
        self.common.invisible || self.flags.invisible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attdef_creation() {
        let attdef = AttributeDefinition::new(
            "TAG".to_string(),
            "Enter value:".to_string(),
            "default".to_string(),
        );
        assert_eq!(attdef.tag, "TAG");
        assert_eq!(attdef.prompt, "Enter value:");
        assert_eq!(attdef.default_value, "default");
    }

    #[test]
    fn test_attdef_simple() {
        let attdef = AttributeDefinition::simple("PART_NO");
        assert_eq!(attdef.tag, "PART_NO");
        assert_eq!(attdef.prompt, "Enter PART_NO:");
    }

    #[test]
    fn test_attdef_constant() {
        let attdef = AttributeDefinition::constant("VERSION", "1.0");
        assert!(attdef.is_constant());
        assert_eq!(attdef.default_value, "1.0");
    }

    #[test]
    fn test_attdef_rotation() {
        let mut attdef = AttributeDefinition::default();
        attdef.set_rotation_degrees(45.0);
        assert!((attdef.rotation_degrees() - 45.0).abs() < 1e-10);
    }

    #[test]
    fn test_attdef_flags() {
        let flags = AttributeFlags::from_bits(7); // invisible + constant + verify
        assert!(flags.invisible);
        assert!(flags.constant);
        assert!(flags.verify);
        assert!(!flags.preset);

        assert_eq!(flags.to_bits(), 7);
    }

    #[test]
    fn test_attdef_builder() {
        let attdef = AttributeDefinition::simple("TEST")
            .with_position(Vector3::new(10.0, 10.0, 0.0))
            .with_height(5.0)
            .with_invisible()
            .with_layer("ATTRIBUTES");

        assert_eq!(attdef.insertion_point, Vector3::new(10.0, 10.0, 0.0));
        assert_eq!(attdef.height, 5.0);
        assert!(attdef.flags.invisible);
        assert_eq!(attdef.common.layer, "ATTRIBUTES");
    }

    #[test]
    fn test_attdef_class_name() {
        let attdef = AttributeDefinition::default();
        assert_eq!(attdef.class_name(), "AcDbAttributeDefinition");
    }
}
