//! Entity types and traits

use crate::types::{Color, Handle, LineWeight, Transparency};

pub mod attribute_definition;
pub mod attribute_entity;
pub mod curve;
pub mod insert;
pub mod line;
pub mod ray;
pub mod xline;

pub use attribute_definition::{
    AttributeDefinition, AttributeFlags, HorizontalAlignment, MTextFlag, TextGenerationFlags,
    VerticalAlignment,
};
pub use attribute_entity::AttributeEntity;
pub use curve::Curve;
pub use insert::Insert;
pub use line::Line;
pub use ray::Ray;
pub use xline::XLine;

/// Base trait for all entities
pub trait Entity {
    /// Common entity data
    fn common(&self) -> &EntityCommon;

    /// Mutable common entity data
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Runtime class name of the entity (e.g. `AcDbBlockReference`)
    fn class_name(&self) -> &'static str;

    /// Get the entity's unique handle
    fn handle(&self) -> Handle {
        self.common().handle
    }

    /// Set the entity's handle
    fn set_handle(&mut self, handle: Handle) {
        self.common_mut().handle = handle;
    }

    /// Handle of the block record that owns this entity
    fn owner(&self) -> Handle {
        self.common().owner
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Set the entity's layer name
    fn set_layer(&mut self, layer: String) {
        self.common_mut().layer = layer;
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Set the entity's color
    fn set_color(&mut self, color: Color) {
        self.common_mut().color = color;
    }

    /// Check if the entity is invisible
    fn is_invisible(&self) -> bool {
        self.common().invisible
    }

    /// Set the entity's visibility
    fn set_invisible(&mut self, invisible: bool) {
        self.common_mut().invisible = invisible;
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Unique handle
    pub handle: Handle,
    /// Handle of the owning block record
    pub owner: Handle,
    /// Layer name
    pub layer: String,
    /// Color
    pub color: Color,
    /// Line weight
    pub line_weight: LineWeight,
    /// Transparency
    pub transparency: Transparency,
    /// Visibility flag
    pub invisible: bool,
    /// Handle of the extension dictionary, if one has been created
    pub extension_dictionary: Handle,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            owner: Handle::NULL,
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
            transparency: Transparency::OPAQUE,
            invisible: false,
            extension_dictionary: Handle::NULL,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone)]
pub enum EntityType {
    /// Line entity
    Line(Line),
    /// Ray entity (semi-infinite line)
    Ray(Ray),
    /// XLine entity (construction line, infinite)
    XLine(XLine),
    /// Insert entity (block reference)
    Insert(Insert),
    /// Attribute definition entity
    AttributeDefinition(AttributeDefinition),
    /// Attribute entity (block attribute instance)
    AttributeEntity(AttributeEntity),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Ray(e) => e,
            EntityType::XLine(e) => e,
            EntityType::Insert(e) => e,
            EntityType::AttributeDefinition(e) => e,
            EntityType::AttributeEntity(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Ray(e) => e,
            EntityType::XLine(e) => e,
            EntityType::Insert(e) => e,
            EntityType::AttributeDefinition(e) => e,
            EntityType::AttributeEntity(e) => e,
        }
    }

    /// Common entity data
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Mutable common entity data
    pub fn common_mut(&mut self) -> &mut EntityCommon {
        self.as_entity_mut().common_mut()
    }

    /// Runtime class name of the contained entity
    pub fn class_name(&self) -> &'static str {
        self.as_entity().class_name()
    }

    /// Get a curve trait object, if this entity is a curve
    pub fn as_curve(&self) -> Option<&dyn Curve> {
        match self {
            EntityType::Line(e) => Some(e),
            EntityType::Ray(e) => Some(e),
            EntityType::XLine(e) => Some(e),
            _ => None,
        }
    }
}
