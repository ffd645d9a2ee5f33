//! Shared test utilities for acadext integration tests.
//!
//! Consolidates the document builders (attributed block definitions,
//! references, dynamic block setups) that the test crates import via
//! `mod common;`.

#![allow(dead_code)]

use acadext::entities::{AttributeDefinition, AttributeEntity, EntityType, Insert};
use acadext::tables::BlockRecord;
use acadext::types::{Handle, Vector3};
use acadext::{CadDocument, DbObject};

// ===========================================================================
// Document builders
// ===========================================================================

/// A block definition with references, as handed out by the builders.
pub struct BlockSetup {
    pub doc: CadDocument,
    pub definition: Handle,
    pub references: Vec<Handle>,
}

/// Build a document with a "DOOR" block definition and `reference_count`
/// references placed in model space.
///
/// The definition carries the given attribute definitions; references
/// start out with no attributes (as if inserted before the definitions
/// existed).
pub fn door_document(templates: Vec<AttributeDefinition>, reference_count: usize) -> BlockSetup {
    let doc = CadDocument::new();
    let mut tx = doc.begin();

    let mut record = BlockRecord::new("DOOR");
    record.flags.has_attributes = !templates.is_empty();
    let definition = tx.add_block_record(record).unwrap();
    for attdef in templates {
        tx.append_to_block(definition, EntityType::AttributeDefinition(attdef))
            .unwrap();
    }

    let mut references = Vec::new();
    for i in 0..reference_count {
        let mut insert = Insert::new("DOOR", Vector3::new(i as f64 * 50.0, 0.0, 0.0));
        insert.block_record = definition;
        references.push(tx.add_entity(EntityType::Insert(insert)).unwrap());
    }
    tx.commit().unwrap();

    BlockSetup {
        doc,
        definition,
        references,
    }
}

/// Extend a setup with a dynamic source definition and one anonymous
/// representation record, plus a dynamic reference pointing at it.
///
/// Marks `definition` dynamic, creates "*U1" derived from it, and adds
/// a reference whose `block_record` is the representation while
/// `dynamic_block_record` retains the source. Returns the
/// representation record handle and the dynamic reference handle.
pub fn add_dynamic_representation(setup: &BlockSetup) -> (Handle, Handle) {
    let doc = &setup.doc;
    let mut tx = doc.begin();

    tx.modify(setup.definition, |obj| {
        if let DbObject::BlockRecord(record) = obj {
            record.flags.is_dynamic = true;
        }
        Ok(())
    })
    .unwrap();

    let mut anon = BlockRecord::new("*U1");
    anon.flags.anonymous = true;
    anon.dynamic_source = setup.definition;
    let representation = tx.add_block_record(anon).unwrap();

    let mut insert = Insert::new("DOOR", Vector3::new(500.0, 0.0, 0.0));
    insert.block_record = representation;
    insert.dynamic_block_record = setup.definition;
    let reference = tx.add_entity(EntityType::Insert(insert)).unwrap();
    tx.commit().unwrap();

    (representation, reference)
}

// ===========================================================================
// Inspection helpers
// ===========================================================================

/// Tags and values of the attributes owned by a block reference,
/// in ownership order, skipping erased ones.
pub fn instance_attributes(doc: &CadDocument, reference: Handle) -> Vec<(String, String)> {
    let tx = doc.begin();
    let owned = tx
        .read(reference, |obj| match obj {
            DbObject::Entity(EntityType::Insert(insert)) => insert.attributes.clone(),
            _ => Vec::new(),
        })
        .unwrap();
    owned
        .into_iter()
        .filter_map(|handle| {
            tx.read(handle, |obj| match obj {
                DbObject::Entity(EntityType::AttributeEntity(attrib)) => {
                    Some((attrib.tag.clone(), attrib.value.clone()))
                }
                _ => None,
            })
            .ok()
            .flatten()
        })
        .collect()
}

/// Tags of all attributes owned by a reference.
pub fn instance_tags(doc: &CadDocument, reference: Handle) -> Vec<String> {
    instance_attributes(doc, reference)
        .into_iter()
        .map(|(tag, _)| tag)
        .collect()
}

/// Full attribute entity clones owned by a reference.
pub fn instance_attribute_entities(doc: &CadDocument, reference: Handle) -> Vec<AttributeEntity> {
    let tx = doc.begin();
    let owned = tx
        .read(reference, |obj| match obj {
            DbObject::Entity(EntityType::Insert(insert)) => insert.attributes.clone(),
            _ => Vec::new(),
        })
        .unwrap();
    owned
        .into_iter()
        .filter_map(|handle| {
            tx.read(handle, |obj| match obj {
                DbObject::Entity(EntityType::AttributeEntity(attrib)) => Some(attrib.clone()),
                _ => None,
            })
            .ok()
            .flatten()
        })
        .collect()
}

/// Set the value of the attribute with the given tag on a reference.
pub fn set_attribute_value(doc: &CadDocument, reference: Handle, tag: &str, value: &str) {
    let tx = doc.begin();
    let owned = tx
        .read(reference, |obj| match obj {
            DbObject::Entity(EntityType::Insert(insert)) => insert.attributes.clone(),
            _ => Vec::new(),
        })
        .unwrap();
    drop(tx);

    let mut tx = doc.begin();
    for handle in owned {
        tx.modify(handle, |obj| {
            if let DbObject::Entity(EntityType::AttributeEntity(attrib)) = obj {
                if attrib.tag.eq_ignore_ascii_case(tag) {
                    attrib.value = value.to_string();
                }
            }
            Ok(())
        })
        .unwrap();
    }
    tx.commit().unwrap();
}

/// Tags of the attribute definitions owned by a block definition,
/// skipping erased ones.
pub fn definition_tags(doc: &CadDocument, definition: Handle) -> Vec<String> {
    let tx = doc.begin();
    let children = tx
        .read_block_record(definition, |record| record.entities.clone())
        .unwrap();
    children
        .into_iter()
        .filter_map(|handle| {
            tx.read(handle, |obj| match obj {
                DbObject::Entity(EntityType::AttributeDefinition(attdef)) => {
                    Some(attdef.tag.clone())
                }
                _ => None,
            })
            .ok()
            .flatten()
        })
        .collect()
}
