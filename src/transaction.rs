//! Scoped transactions over the document store
//!
//! A `Transaction` is a scoped read/write checkout: mutations apply to
//! the store immediately (so nested scopes observe them) while a
//! per-scope journal records pre-images. `commit()` seals the scope and
//! discards the journal; dropping an uncommitted scope restores the
//! pre-images in reverse order. Scopes stack and commit independently,
//! so aborting a later scope never undoes an earlier committed one.

use crate::document::{CadDocument, DbObject, DbSlot};
use crate::entities::EntityType;
use crate::error::{CadError, Result};
use crate::objects::{Dictionary, ObjectType, XRecord, XRecordEntry};
use crate::tables::BlockRecord;
use crate::types::Handle;

/// One journal entry; applied in reverse on rollback
#[derive(Debug)]
enum UndoRecord {
    /// Slot pre-image before a mutation (covers erase too)
    Modify { handle: Handle, before: DbSlot },
    /// Slot created in this scope
    Add { handle: Handle },
    /// Block table name entry created in this scope
    BlockName { name: String },
    /// Handle seed before an allocation
    HandleSeed { before: u64 },
}

/// A scoped unit of read/write access to a document
pub struct Transaction {
    doc: CadDocument,
    journal: Vec<UndoRecord>,
    committed: bool,
}

impl Transaction {
    pub(crate) fn new(doc: CadDocument) -> Self {
        Transaction {
            doc,
            journal: Vec::new(),
            committed: false,
        }
    }

    /// The document this transaction operates on
    pub fn document(&self) -> &CadDocument {
        &self.doc
    }

    /// Whether the scope is still open
    pub fn is_open(&self) -> bool {
        !self.committed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.committed {
            return Err(CadError::TransactionClosed);
        }
        Ok(())
    }

    /// Read an object through the transaction
    pub fn read<R>(&self, handle: Handle, f: impl FnOnce(&DbObject) -> R) -> Result<R> {
        self.ensure_open()?;
        let core = self.doc.core();
        Ok(f(core.resolve(handle)?))
    }

    /// Read a block record through the transaction
    pub fn read_block_record<R>(
        &self,
        handle: Handle,
        f: impl FnOnce(&BlockRecord) -> R,
    ) -> Result<R> {
        self.ensure_open()?;
        let core = self.doc.core();
        Ok(f(core.resolve_block_record(handle)?))
    }

    /// Mutate an object, journaling its pre-image
    ///
    /// If the closure fails the pre-image is restored immediately and
    /// nothing is journaled.
    pub fn modify<R>(
        &mut self,
        handle: Handle,
        f: impl FnOnce(&mut DbObject) -> Result<R>,
    ) -> Result<R> {
        self.ensure_open()?;
        let mut core = self.doc.core_mut();
        let before = core.slot(handle)?.clone();
        match f(core.resolve_mut(handle)?) {
            Ok(result) => {
                drop(core);
                self.journal.push(UndoRecord::Modify { handle, before });
                Ok(result)
            }
            Err(err) => {
                core.objects.insert(handle, before);
                Err(err)
            }
        }
    }

    /// Add an entity to the store
    ///
    /// Entities with no owner land in model space.
    pub fn add_entity(&mut self, mut entity: EntityType) -> Result<Handle> {
        self.ensure_open()?;
        let mut core = self.doc.core_mut();
        if entity.common().owner.is_null() {
            let model = core.model_space;
            entity.common_mut().owner = model;
        }
        let seed = core.next_handle;
        let handle = core.allocate_handle();
        entity.common_mut().handle = handle;
        core.objects.insert(
            handle,
            DbSlot {
                erased: false,
                object: DbObject::Entity(entity),
            },
        );
        drop(core);
        self.journal.push(UndoRecord::HandleSeed { before: seed });
        self.journal.push(UndoRecord::Add { handle });
        Ok(handle)
    }

    /// Add a block record, registering its name in the block table
    pub fn add_block_record(&mut self, mut record: BlockRecord) -> Result<Handle> {
        self.ensure_open()?;
        let mut core = self.doc.core_mut();
        let seed = core.next_handle;
        let handle = core.allocate_handle();
        record.handle = handle;
        let name = record.name.clone();
        if let Err(err) = core.block_table.add(&name, handle) {
            core.next_handle = seed;
            return Err(err);
        }
        core.objects.insert(
            handle,
            DbSlot {
                erased: false,
                object: DbObject::BlockRecord(record),
            },
        );
        drop(core);
        self.journal.push(UndoRecord::HandleSeed { before: seed });
        self.journal.push(UndoRecord::BlockName { name });
        self.journal.push(UndoRecord::Add { handle });
        Ok(handle)
    }

    /// Add a non-graphical object to the store
    pub fn add_object(&mut self, mut object: ObjectType) -> Result<Handle> {
        self.ensure_open()?;
        let mut core = self.doc.core_mut();
        let seed = core.next_handle;
        let handle = core.allocate_handle();
        object.set_handle(handle);
        core.objects.insert(
            handle,
            DbSlot {
                erased: false,
                object: DbObject::Object(object),
            },
        );
        drop(core);
        self.journal.push(UndoRecord::HandleSeed { before: seed });
        self.journal.push(UndoRecord::Add { handle });
        Ok(handle)
    }

    /// Add an entity as a child of a block definition
    pub fn append_to_block(&mut self, block: Handle, mut entity: EntityType) -> Result<Handle> {
        self.ensure_open()?;
        // Validate the target first so a bad block leaves no trace
        self.read_block_record(block, |_| ())?;
        entity.common_mut().owner = block;
        let handle = self.add_entity(entity)?;
        self.modify(block, |obj| match obj {
            DbObject::BlockRecord(record) => {
                record.entities.push(handle);
                Ok(())
            }
            _ => Err(CadError::Precondition(format!(
                "handle {:#X} is not a block record",
                block.value()
            ))),
        })?;
        Ok(handle)
    }

    /// Soft-erase an object; erasing an already-erased object is a no-op
    pub fn erase(&mut self, handle: Handle) -> Result<()> {
        self.ensure_open()?;
        let mut core = self.doc.core_mut();
        let before = core.slot(handle)?.clone();
        if before.erased {
            return Ok(());
        }
        if let Some(slot) = core.objects.get_mut(&handle) {
            slot.erased = true;
        }
        drop(core);
        self.journal.push(UndoRecord::Modify { handle, before });
        Ok(())
    }

    /// Commit the scope, keeping all changes
    ///
    /// Committing twice is an error; dropping after commit is a no-op.
    pub fn commit(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.committed = true;
        self.journal.clear();
        Ok(())
    }

    fn rollback(&mut self) {
        let mut core = self.doc.core_mut();
        for record in self.journal.drain(..).rev() {
            match record {
                UndoRecord::Modify { handle, before } => {
                    core.objects.insert(handle, before);
                }
                UndoRecord::Add { handle } => {
                    core.objects.remove(&handle);
                }
                UndoRecord::BlockName { name } => {
                    core.block_table.remove(&name);
                }
                UndoRecord::HandleSeed { before } => {
                    core.next_handle = before;
                }
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

// ---------------------------------------------------------------------------
// Extension data: per-object keyed xrecord lists
// ---------------------------------------------------------------------------

fn extension_dictionary_of(object: &DbObject) -> Result<Handle> {
    match object {
        DbObject::Entity(entity) => Ok(entity.common().extension_dictionary),
        DbObject::BlockRecord(record) => Ok(record.extension_dictionary),
        DbObject::Object(_) => Err(CadError::Precondition(
            "object cannot carry an extension dictionary".to_string(),
        )),
    }
}

fn set_extension_dictionary(object: &mut DbObject, handle: Handle) -> Result<()> {
    match object {
        DbObject::Entity(entity) => {
            entity.common_mut().extension_dictionary = handle;
            Ok(())
        }
        DbObject::BlockRecord(record) => {
            record.extension_dictionary = handle;
            Ok(())
        }
        DbObject::Object(_) => Err(CadError::Precondition(
            "object cannot carry an extension dictionary".to_string(),
        )),
    }
}

impl Transaction {
    /// Write an xrecord under `key` in the target's extension dictionary
    ///
    /// Creates the dictionary on first use. If the key already exists:
    /// with `rewrite` the entry list is replaced wholesale; otherwise
    /// the new values are appended (`allow_duplicates`) or merged with
    /// duplicates skipped, where two entries are duplicates when their
    /// `(code, value)` pairs match.
    pub fn write_xrecord(
        &mut self,
        target: Handle,
        key: &str,
        values: Vec<XRecordEntry>,
        rewrite: bool,
        allow_duplicates: bool,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(CadError::InvalidArgument(
                "extension data key must not be empty".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(CadError::InvalidArgument(
                "extension data values must not be empty".to_string(),
            ));
        }

        let mut dict_handle = self.read(target, extension_dictionary_of)??;
        if dict_handle.is_null() {
            let mut dict = Dictionary::new();
            dict.owner = target;
            dict_handle = self.add_object(ObjectType::Dictionary(dict))?;
            self.modify(target, |obj| set_extension_dictionary(obj, dict_handle))?;
        }

        let existing = self.read(dict_handle, |obj| match obj {
            DbObject::Object(ObjectType::Dictionary(dict)) => dict.get(key),
            _ => None,
        })?;

        match existing {
            Some(xrecord_handle) => self.modify(xrecord_handle, |obj| match obj {
                DbObject::Object(ObjectType::XRecord(xrecord)) => {
                    if rewrite {
                        xrecord.entries = values;
                    } else if allow_duplicates {
                        xrecord.entries.extend(values);
                    } else {
                        xrecord.merge_entries(values);
                    }
                    Ok(())
                }
                _ => Err(CadError::Precondition(format!(
                    "dictionary entry {} is not an xrecord",
                    key
                ))),
            }),
            None => {
                let mut xrecord = XRecord::with_entries(values);
                xrecord.owner = dict_handle;
                let xrecord_handle = self.add_object(ObjectType::XRecord(xrecord))?;
                self.modify(dict_handle, |obj| match obj {
                    DbObject::Object(ObjectType::Dictionary(dict)) => {
                        dict.set_entry(key, xrecord_handle);
                        Ok(())
                    }
                    _ => Err(CadError::Precondition(
                        "extension dictionary handle does not address a dictionary".to_string(),
                    )),
                })
            }
        }
    }

    /// Read the xrecord entries stored under `key`, if any
    ///
    /// A missing dictionary or key yields `None`, not an error.
    pub fn read_xrecord(&self, target: Handle, key: &str) -> Result<Option<Vec<XRecordEntry>>> {
        if key.is_empty() {
            return Err(CadError::InvalidArgument(
                "extension data key must not be empty".to_string(),
            ));
        }
        let dict_handle = self.read(target, extension_dictionary_of)??;
        if dict_handle.is_null() {
            return Ok(None);
        }
        let xrecord_handle = self.read(dict_handle, |obj| match obj {
            DbObject::Object(ObjectType::Dictionary(dict)) => dict.get(key),
            _ => None,
        })?;
        let Some(xrecord_handle) = xrecord_handle else {
            return Ok(None);
        };
        self.read(xrecord_handle, |obj| match obj {
            DbObject::Object(ObjectType::XRecord(xrecord)) => Some(xrecord.entries.clone()),
            _ => None,
        })
    }

    /// Delete the xrecord stored under `key`
    ///
    /// Removing the last key erases the dictionary itself and detaches
    /// it from the target (an empty extension dictionary is invalid).
    /// Deleting an absent key is a no-op.
    pub fn delete_xrecord(&mut self, target: Handle, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CadError::InvalidArgument(
                "extension data key must not be empty".to_string(),
            ));
        }
        let dict_handle = self.read(target, extension_dictionary_of)??;
        if dict_handle.is_null() {
            return Ok(());
        }
        let xrecord_handle = self.read(dict_handle, |obj| match obj {
            DbObject::Object(ObjectType::Dictionary(dict)) => dict.get(key),
            _ => None,
        })?;
        let Some(xrecord_handle) = xrecord_handle else {
            return Ok(());
        };

        self.erase(xrecord_handle)?;
        let now_empty = self.modify(dict_handle, |obj| match obj {
            DbObject::Object(ObjectType::Dictionary(dict)) => {
                dict.remove(key);
                Ok(dict.is_empty())
            }
            _ => Err(CadError::Precondition(
                "extension dictionary handle does not address a dictionary".to_string(),
            )),
        })?;

        if now_empty {
            self.erase(dict_handle)?;
            self.modify(target, |obj| set_extension_dictionary(obj, Handle::NULL))?;
        }
        Ok(())
    }
}
