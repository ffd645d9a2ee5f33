//! Symbol tables and their entries

use crate::error::{CadError, Result};
use crate::types::Handle;
use indexmap::IndexMap;

pub mod block_record;

pub use block_record::{BlockFlags, BlockRecord};

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's unique handle
    fn handle(&self) -> Handle;

    /// Set the entry's handle
    fn set_handle(&mut self, handle: Handle);

    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);

    /// Check if this is a standard/default entry
    fn is_standard(&self) -> bool {
        false
    }
}

/// Case-insensitive name index for a symbol table
///
/// Entries themselves live in the document's object store; the table
/// maps uppercase names to handles and preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, Handle>,
}

impl SymbolTable {
    /// Create a new empty table
    pub fn new() -> Self {
        SymbolTable {
            entries: IndexMap::new(),
        }
    }

    /// Register an entry under a name (case-insensitive)
    pub fn add(&mut self, name: &str, handle: Handle) -> Result<()> {
        let key = name.to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(CadError::DuplicateEntry(name.to_string()));
        }
        self.entries.insert(key, handle);
        Ok(())
    }

    /// Look up an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.entries.get(&name.to_uppercase()).copied()
    }

    /// Remove an entry by name (case-insensitive)
    pub fn remove(&mut self, name: &str) -> Option<Handle> {
        self.entries.shift_remove(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over handles in insertion order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.values().copied()
    }

    /// Iterate over (uppercase name, handle) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
