//! Block record table entry

use super::TableEntry;
use crate::types::Handle;

/// Block record flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFlags {
    /// Block is anonymous (representation records, hatches, etc.)
    pub anonymous: bool,
    /// Block contains attribute definitions
    pub has_attributes: bool,
    /// Block is a dynamic block definition
    pub is_dynamic: bool,
}

/// A block record table entry
///
/// Owns the entities that make up the block definition. Anonymous
/// records created for dynamic block references carry the handle of
/// the named definition they were derived from in `dynamic_source`.
#[derive(Debug, Clone)]
pub struct BlockRecord {
    /// Unique handle for the block record table entry
    pub handle: Handle,
    /// Block name
    pub name: String,
    /// Block flags
    pub flags: BlockFlags,
    /// Named definition this anonymous representation was derived from
    pub dynamic_source: Handle,
    /// Handle of the extension dictionary, if one has been created
    pub extension_dictionary: Handle,
    /// Handles of the entities owned by this block
    pub entities: Vec<Handle>,
}

impl BlockRecord {
    /// Create a new block record
    pub fn new(name: impl Into<String>) -> Self {
        BlockRecord {
            handle: Handle::NULL,
            name: name.into(),
            flags: BlockFlags::default(),
            dynamic_source: Handle::NULL,
            extension_dictionary: Handle::NULL,
            entities: Vec::new(),
        }
    }

    /// Create the model space block record
    pub fn model_space() -> Self {
        BlockRecord::new("*Model_Space")
    }

    /// Create the paper space block record
    pub fn paper_space() -> Self {
        BlockRecord::new("*Paper_Space")
    }

    /// Check if this is a model space block
    pub fn is_model_space(&self) -> bool {
        self.name == "*Model_Space"
    }

    /// Check if this is a paper space block
    pub fn is_paper_space(&self) -> bool {
        self.name.starts_with("*Paper_Space")
    }

    /// Check if this block is anonymous
    pub fn is_anonymous(&self) -> bool {
        self.flags.anonymous || self.name.starts_with('*')
    }

    /// Check if this block is a dynamic block definition
    pub fn is_dynamic(&self) -> bool {
        self.flags.is_dynamic
    }

    /// Check if this is an anonymous representation of a dynamic block
    pub fn is_dynamic_representation(&self) -> bool {
        self.is_anonymous() && self.dynamic_source.is_valid()
    }
}

impl TableEntry for BlockRecord {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_standard(&self) -> bool {
        self.is_model_space() || self.is_paper_space()
    }
}
