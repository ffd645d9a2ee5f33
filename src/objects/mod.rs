//! Non-graphical objects
//!
//! Dictionaries and xrecords back the per-object extension data store:
//! an entity's extension dictionary maps application keys to xrecords
//! holding typed entry lists.

mod xrecord;

pub use xrecord::{XRecord, XRecordEntry, XRecordValue};

use crate::types::Handle;
use indexmap::IndexMap;

/// Dictionary object - maps string keys to object handles
///
/// Keys are case-sensitive and insertion order is preserved.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Unique handle
    pub handle: Handle,
    /// Owner handle (soft pointer)
    pub owner: Handle,
    /// Dictionary entries (key -> handle)
    pub entries: IndexMap<String, Handle>,
}

impl Dictionary {
    /// Create a new dictionary
    pub fn new() -> Self {
        Self {
            handle: Handle::NULL,
            owner: Handle::NULL,
            entries: IndexMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn set_entry(&mut self, key: impl Into<String>, handle: Handle) {
        self.entries.insert(key.into(), handle);
    }

    /// Get a handle by key
    pub fn get(&self, key: &str) -> Option<Handle> {
        self.entries.get(key).copied()
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry by key
    pub fn remove(&mut self, key: &str) -> Option<Handle> {
        self.entries.shift_remove(key)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, handle) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Enumeration of non-graphical object types for type-safe storage
#[derive(Debug, Clone)]
pub enum ObjectType {
    /// Dictionary object
    Dictionary(Dictionary),
    /// XRecord object
    XRecord(XRecord),
}

impl ObjectType {
    /// Get the object's handle
    pub fn handle(&self) -> Handle {
        match self {
            ObjectType::Dictionary(d) => d.handle,
            ObjectType::XRecord(x) => x.handle,
        }
    }

    /// Set the object's handle
    pub fn set_handle(&mut self, handle: Handle) {
        match self {
            ObjectType::Dictionary(d) => d.handle = handle,
            ObjectType::XRecord(x) => x.handle = handle,
        }
    }

    /// Runtime class name of the contained object
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectType::Dictionary(_) => "AcDbDictionary",
            ObjectType::XRecord(_) => "AcDbXrecord",
        }
    }
}
