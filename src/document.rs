//! Document structure and the handle-addressed object store

use crate::classes::ClassRegistry;
use crate::entities::EntityType;
use crate::error::{CadError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::objects::ObjectType;
use crate::tables::{BlockRecord, SymbolTable};
use crate::transaction::Transaction;
use crate::types::Handle;
use ahash::AHashMap;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Any object addressable by handle
#[derive(Debug, Clone)]
pub enum DbObject {
    /// Graphical entity
    Entity(EntityType),
    /// Block record table entry
    BlockRecord(BlockRecord),
    /// Non-graphical object
    Object(ObjectType),
}

impl DbObject {
    /// Runtime class name of the contained object
    pub fn class_name(&self) -> &'static str {
        match self {
            DbObject::Entity(e) => e.class_name(),
            DbObject::BlockRecord(_) => "AcDbBlockTableRecord",
            DbObject::Object(o) => o.class_name(),
        }
    }

    /// Get the contained entity, if this is one
    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            DbObject::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Get the contained block record, if this is one
    pub fn as_block_record(&self) -> Option<&BlockRecord> {
        match self {
            DbObject::BlockRecord(b) => Some(b),
            _ => None,
        }
    }
}

/// Storage slot for one object
///
/// Erase is soft: the slot stays in the store with `erased` set, the
/// handle never becomes reusable, and plain resolution fails.
#[derive(Debug, Clone)]
pub struct DbSlot {
    /// Soft-erase flag
    pub erased: bool,
    /// The stored object
    pub object: DbObject,
}

/// The document's internal state
#[derive(Debug)]
pub struct DocCore {
    /// All objects, indexed by handle
    pub(crate) objects: AHashMap<Handle, DbSlot>,
    /// Block record name index
    pub(crate) block_table: SymbolTable,
    /// Next handle to assign
    pub(crate) next_handle: u64,
    /// Model space block record handle
    pub(crate) model_space: Handle,
    /// Paper space block record handle
    pub(crate) paper_space: Handle,
    /// Runtime class registry
    pub classes: ClassRegistry,
    /// Diagnostics collected during operations
    pub notifications: NotificationCollection,
}

impl DocCore {
    fn new() -> Self {
        let mut core = DocCore {
            objects: AHashMap::new(),
            block_table: SymbolTable::new(),
            // Handles below 0x10 are reserved
            next_handle: 0x10,
            model_space: Handle::NULL,
            paper_space: Handle::NULL,
            classes: ClassRegistry::new(),
            notifications: NotificationCollection::new(),
        };

        let model = core.insert_block_record(BlockRecord::model_space());
        let paper = core.insert_block_record(BlockRecord::paper_space());
        core.model_space = model;
        core.paper_space = paper;
        core
    }

    /// Allocate a new unique handle
    pub(crate) fn allocate_handle(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn insert_block_record(&mut self, mut record: BlockRecord) -> Handle {
        let handle = self.allocate_handle();
        record.handle = handle;
        // Initialization only; the names are fresh so this cannot collide
        let _ = self.block_table.add(&record.name, handle);
        self.objects.insert(
            handle,
            DbSlot {
                erased: false,
                object: DbObject::BlockRecord(record),
            },
        );
        handle
    }

    /// Look up a slot regardless of its erased flag
    pub(crate) fn slot(&self, handle: Handle) -> Result<&DbSlot> {
        self.objects
            .get(&handle)
            .ok_or(CadError::ObjectNotFound(handle.value()))
    }

    /// Resolve a handle to a live object
    pub(crate) fn resolve(&self, handle: Handle) -> Result<&DbObject> {
        let slot = self.slot(handle)?;
        if slot.erased {
            return Err(CadError::ObjectErased(handle.value()));
        }
        Ok(&slot.object)
    }

    /// Resolve a handle to a live object, mutably
    pub(crate) fn resolve_mut(&mut self, handle: Handle) -> Result<&mut DbObject> {
        let slot = self
            .objects
            .get_mut(&handle)
            .ok_or(CadError::ObjectNotFound(handle.value()))?;
        if slot.erased {
            return Err(CadError::ObjectErased(handle.value()));
        }
        Ok(&mut slot.object)
    }

    /// Resolve a handle to a live block record
    pub(crate) fn resolve_block_record(&self, handle: Handle) -> Result<&BlockRecord> {
        match self.resolve(handle)? {
            DbObject::BlockRecord(record) => Ok(record),
            other => Err(CadError::Precondition(format!(
                "handle {:#X} is a {}, not a block record",
                handle.value(),
                other.class_name()
            ))),
        }
    }
}

/// A CAD document: shared-ownership façade over the object store
///
/// Cloning a `CadDocument` is cheap and yields another handle to the
/// same underlying store.
#[derive(Debug, Clone)]
pub struct CadDocument {
    core: Rc<RefCell<DocCore>>,
}

impl CadDocument {
    /// Create a new empty document with model and paper space blocks
    pub fn new() -> Self {
        CadDocument {
            core: Rc::new(RefCell::new(DocCore::new())),
        }
    }

    /// Open a transaction over this document
    pub fn begin(&self) -> Transaction {
        Transaction::new(self.clone())
    }

    pub(crate) fn core(&self) -> Ref<'_, DocCore> {
        self.core.borrow()
    }

    pub(crate) fn core_mut(&self) -> RefMut<'_, DocCore> {
        self.core.borrow_mut()
    }

    /// Check whether two documents share the same underlying store
    pub fn same_store(&self, other: &CadDocument) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Model space block record handle
    pub fn model_space(&self) -> Handle {
        self.core().model_space
    }

    /// Paper space block record handle
    pub fn paper_space(&self) -> Handle {
        self.core().paper_space
    }

    /// Look up a block record by name (case-insensitive)
    pub fn block(&self, name: &str) -> Option<Handle> {
        self.core().block_table.get(name)
    }

    /// Record a diagnostic notification
    pub(crate) fn notify(&self, nt: NotificationType, message: impl Into<String>) {
        self.core_mut().notifications.notify(nt, message);
    }

    /// Snapshot of the diagnostics collected so far
    pub fn notifications(&self) -> NotificationCollection {
        self.core().notifications.clone()
    }

    /// Register a runtime class under an existing parent class
    ///
    /// Invalidates all memoized capability facts.
    pub fn register_class(&self, name: &str, parent: &str) -> Result<()> {
        self.core_mut().classes.register(name, parent)
    }

    /// Runtime class name of the object behind a handle
    ///
    /// Works on erased objects too; only a dangling handle fails.
    pub fn class_of(&self, handle: Handle) -> Result<&'static str> {
        Ok(self.core().slot(handle)?.object.class_name())
    }

    /// Check whether the object behind a handle is a kind of `capability`
    pub fn is_kind_of(&self, handle: Handle, capability: &str) -> Result<bool> {
        let core = self.core();
        let class = core.slot(handle)?.object.class_name();
        core.classes.is_kind_of(class, capability)
    }

    /// Check whether the object behind a handle is exactly of `capability`
    ///
    /// Valid only for leaf capabilities; see
    /// [`ClassRegistry::is_exact_kind`].
    pub fn exact_kind_of(&self, handle: Handle, capability: &str) -> Result<bool> {
        let core = self.core();
        let class = core.slot(handle)?.object.class_name();
        core.classes.is_exact_kind(class, capability)
    }

    /// Filter handles down to those of a given kind
    pub fn filter_of_kind(&self, handles: &[Handle], capability: &str) -> Result<Vec<Handle>> {
        let mut result = Vec::new();
        for &handle in handles {
            if self.is_kind_of(handle, capability)? {
                result.push(handle);
            }
        }
        Ok(result)
    }

    /// Check whether any handle is of a given kind
    pub fn any_of_kind(&self, handles: &[Handle], capability: &str) -> Result<bool> {
        for &handle in handles {
            if self.is_kind_of(handle, capability)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Check whether all handles are of a given kind
    pub fn all_of_kind(&self, handles: &[Handle], capability: &str) -> Result<bool> {
        for &handle in handles {
            if !self.is_kind_of(handle, capability)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Group all live entities in the document by runtime class name
    pub fn entities_by_class(&self) -> IndexMap<String, Vec<Handle>> {
        let core = self.core();
        let mut groups: IndexMap<String, Vec<Handle>> = IndexMap::new();
        let mut handles: Vec<Handle> = core
            .objects
            .iter()
            .filter(|(_, slot)| !slot.erased && matches!(slot.object, DbObject::Entity(_)))
            .map(|(h, _)| *h)
            .collect();
        handles.sort();
        for handle in handles {
            if let Ok(DbObject::Entity(entity)) = core.resolve(handle) {
                groups
                    .entry(entity.class_name().to_string())
                    .or_default()
                    .push(handle);
            }
        }
        groups
    }

    /// Group a block definition's live children by runtime class name
    pub fn block_children_by_class(
        &self,
        definition: Handle,
    ) -> Result<IndexMap<String, Vec<Handle>>> {
        let core = self.core();
        let record = core.resolve_block_record(definition)?;
        let mut groups: IndexMap<String, Vec<Handle>> = IndexMap::new();
        for &child in &record.entities {
            // Erased children stay listed but drop out of enumeration
            let slot = core.slot(child)?;
            if slot.erased {
                continue;
            }
            groups
                .entry(slot.object.class_name().to_string())
                .or_default()
                .push(child);
        }
        Ok(groups)
    }

    /// Effective block name of a block reference
    ///
    /// For a dynamic reference this is the name of the named source
    /// definition, not the anonymous representation record.
    pub fn effective_name(&self, reference: Handle) -> Result<String> {
        let core = self.core();
        let insert = match core.resolve(reference)? {
            DbObject::Entity(EntityType::Insert(insert)) => insert,
            other => {
                return Err(CadError::Precondition(format!(
                    "handle {:#X} is a {}, not a block reference",
                    reference.value(),
                    other.class_name()
                )))
            }
        };
        if insert.dynamic_block_record.is_valid() {
            return Ok(core
                .resolve_block_record(insert.dynamic_block_record)?
                .name
                .clone());
        }
        if insert.block_record.is_valid() {
            let record = core.resolve_block_record(insert.block_record)?;
            if record.is_dynamic_representation() {
                return Ok(core
                    .resolve_block_record(record.dynamic_source)?
                    .name
                    .clone());
            }
            return Ok(record.name.clone());
        }
        Ok(insert.block_name.clone())
    }

    /// Anonymous definitions generated from a dynamic block definition
    pub fn anonymous_definitions_of(&self, definition: Handle) -> Result<Vec<Handle>> {
        let core = self.core();
        core.resolve_block_record(definition)?;
        let mut result: Vec<Handle> = core
            .objects
            .iter()
            .filter(|(_, slot)| {
                !slot.erased
                    && slot
                        .object
                        .as_block_record()
                        .is_some_and(|r| r.dynamic_source == definition)
            })
            .map(|(h, _)| *h)
            .collect();
        result.sort();
        Ok(result)
    }

    /// Live block references whose effective definition is `definition`
    ///
    /// With `direct_only` the search is limited to references placed in
    /// model or paper space; otherwise references nested inside other
    /// block definitions are included too.
    pub fn references_of(&self, definition: Handle, direct_only: bool) -> Result<Vec<Handle>> {
        let core = self.core();
        core.resolve_block_record(definition)?;
        let mut result: Vec<Handle> = core
            .objects
            .iter()
            .filter(|(_, slot)| {
                if slot.erased {
                    return false;
                }
                let DbObject::Entity(EntityType::Insert(insert)) = &slot.object else {
                    return false;
                };
                if insert.block_record != definition {
                    return false;
                }
                if direct_only {
                    let owner = insert.common.owner;
                    owner == core.model_space || owner == core.paper_space
                } else {
                    true
                }
            })
            .map(|(h, _)| *h)
            .collect();
        result.sort();
        Ok(result)
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CURRENT_DOCUMENT: RefCell<Option<CadDocument>> = const { RefCell::new(None) };
}

impl CadDocument {
    /// The thread's current working document, if any
    pub fn current() -> Option<CadDocument> {
        CURRENT_DOCUMENT.with(|slot| slot.borrow().clone())
    }

    /// Make this document the thread's current working document
    ///
    /// Returns the previous working document, if any.
    pub fn make_current(&self) -> Option<CadDocument> {
        CURRENT_DOCUMENT.with(|slot| slot.borrow_mut().replace(self.clone()))
    }
}

/// RAII guard that temporarily switches the thread's working document
///
/// On drop the previous working document (or none) is restored.
#[derive(Debug)]
pub struct WorkingDocumentSwitcher {
    previous: Option<CadDocument>,
}

impl WorkingDocumentSwitcher {
    /// Switch the working document to `doc` until the guard is dropped
    pub fn switch_to(doc: &CadDocument) -> Self {
        WorkingDocumentSwitcher {
            previous: doc.make_current(),
        }
    }
}

impl Drop for WorkingDocumentSwitcher {
    fn drop(&mut self) {
        CURRENT_DOCUMENT.with(|slot| {
            *slot.borrow_mut() = self.previous.take();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_spaces() {
        let doc = CadDocument::new();
        assert!(doc.model_space().is_valid());
        assert!(doc.paper_space().is_valid());
        assert_ne!(doc.model_space(), doc.paper_space());
        assert_eq!(doc.block("*MODEL_SPACE"), Some(doc.model_space()));
    }

    #[test]
    fn test_document_clone_shares_store() {
        let doc = CadDocument::new();
        let alias = doc.clone();
        assert!(doc.same_store(&alias));
        assert_eq!(alias.model_space(), doc.model_space());
    }

    #[test]
    fn test_class_of_unknown_handle() {
        let doc = CadDocument::new();
        let err = doc.class_of(Handle::new(0xBEEF)).unwrap_err();
        assert!(matches!(err, CadError::ObjectNotFound(_)));
    }

    #[test]
    fn test_effective_name_chases_the_dynamic_source() {
        let doc = CadDocument::new();
        let mut tx = doc.begin();

        let mut source = BlockRecord::new("DOOR");
        source.flags.is_dynamic = true;
        let source = tx.add_block_record(source).unwrap();

        let mut anon = BlockRecord::new("*U7");
        anon.flags.anonymous = true;
        anon.dynamic_source = source;
        let anon = tx.add_block_record(anon).unwrap();

        let mut plain = crate::entities::Insert::new("DOOR", crate::types::Vector3::ZERO);
        plain.block_record = source;
        let plain = tx
            .add_entity(EntityType::Insert(plain))
            .unwrap();

        let mut dynamic = crate::entities::Insert::new("DOOR", crate::types::Vector3::ZERO);
        dynamic.block_record = anon;
        dynamic.dynamic_block_record = source;
        let dynamic = tx
            .add_entity(EntityType::Insert(dynamic))
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(doc.effective_name(plain).unwrap(), "DOOR");
        // The dynamic reference resolves through the representation
        assert_eq!(doc.effective_name(dynamic).unwrap(), "DOOR");
        assert_eq!(doc.anonymous_definitions_of(source).unwrap(), vec![anon]);
        assert!(doc.anonymous_definitions_of(anon).unwrap().is_empty());
    }

    #[test]
    fn test_working_document_switcher() {
        let first = CadDocument::new();
        let second = CadDocument::new();
        first.make_current();

        {
            let _guard = WorkingDocumentSwitcher::switch_to(&second);
            assert!(CadDocument::current().unwrap().same_store(&second));
        }
        assert!(CadDocument::current().unwrap().same_store(&first));
    }
}
