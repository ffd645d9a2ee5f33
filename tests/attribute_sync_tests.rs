//! Attribute synchronization scenarios — missing attributes, stray
//! attributes, constant definitions, user values, placement, and
//! dynamic block propagation.

mod common;

use acadext::entities::{AttributeDefinition, AttributeEntity, EntityType, Insert};
use acadext::notification::NotificationType;
use acadext::sync::{synchronize_attributes, SyncOptions};
use acadext::types::Vector3;
use acadext::{CadError, DbObject, SyncReport};

use common::*;

fn door_templates() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::simple("TAG1").with_default_value("D1"),
        AttributeDefinition::constant("TAG2", "C2"),
    ]
}

// ---------------------------------------------------------------------------
// Core reconciliation
// ---------------------------------------------------------------------------

#[test]
fn sync_adds_missing_attributes_but_never_constants() {
    let setup = door_document(door_templates(), 2);

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(report.instances_visited, 2);
    assert_eq!(report.attributes_added, 2);
    for &reference in &setup.references {
        // TAG2 is constant and must never materialize on instances
        assert_eq!(instance_tags(&setup.doc, reference), vec!["TAG1"]);
    }
}

#[test]
fn sync_is_idempotent() {
    let setup = door_document(door_templates(), 2);

    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    let before: Vec<_> = setup
        .references
        .iter()
        .map(|&r| instance_attributes(&setup.doc, r))
        .collect();

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(report.attributes_added, 0);
    assert_eq!(report.attributes_removed, 0);
    let after: Vec<_> = setup
        .references
        .iter()
        .map(|&r| instance_attributes(&setup.doc, r))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn sync_removes_stray_attributes() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    // A stray attribute with no matching definition appears
    let mut tx = setup.doc.begin();
    let mut stray = AttributeEntity::simple("TAG3", "stale");
    stray.common.owner = reference;
    let stray = tx.add_entity(EntityType::AttributeEntity(stray)).unwrap();
    tx.modify(reference, |obj| {
        if let DbObject::Entity(EntityType::Insert(insert)) = obj {
            insert.attributes.push(stray);
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    assert_eq!(report.attributes_removed, 1);
    assert_eq!(instance_tags(&setup.doc, reference), vec!["TAG1"]);
}

#[test]
fn constant_tagged_instance_attributes_count_as_stray() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];

    // An instance attribute whose tag collides with the constant TAG2
    let mut tx = setup.doc.begin();
    let mut attrib = AttributeEntity::simple("TAG2", "stale copy");
    attrib.common.owner = reference;
    let attrib = tx.add_entity(EntityType::AttributeEntity(attrib)).unwrap();
    tx.modify(reference, |obj| {
        if let DbObject::Entity(EntityType::Insert(insert)) = obj {
            insert.attributes.push(attrib);
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    // Constants only live in the definition, so the colliding attribute
    // is erased rather than refreshed
    assert_eq!(report.attributes_removed, 1);
    assert_eq!(report.attributes_refreshed, 0);
    assert_eq!(instance_tags(&setup.doc, reference), vec!["TAG1"]);
}

#[test]
fn sync_keeps_stray_attributes_when_asked() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    let mut tx = setup.doc.begin();
    let mut stray = AttributeEntity::simple("TAG3", "keep me");
    stray.common.owner = reference;
    let stray = tx.add_entity(EntityType::AttributeEntity(stray)).unwrap();
    tx.modify(reference, |obj| {
        if let DbObject::Entity(EntityType::Insert(insert)) = obj {
            insert.attributes.push(stray);
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    let options = SyncOptions {
        remove_superfluous: false,
        ..SyncOptions::default()
    };
    let report = synchronize_attributes(&setup.doc, setup.definition, options).unwrap();
    assert_eq!(report.attributes_removed, 0);
    assert_eq!(instance_tags(&setup.doc, reference), vec!["TAG1", "TAG3"]);
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[test]
fn sync_preserves_user_entered_values() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    set_attribute_value(&setup.doc, reference, "TAG1", "Room 101");

    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(
        instance_attributes(&setup.doc, reference),
        vec![("TAG1".to_string(), "Room 101".to_string())]
    );
}

#[test]
fn sync_resets_values_when_asked() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    set_attribute_value(&setup.doc, reference, "TAG1", "Room 101");

    let options = SyncOptions {
        reset_to_default: true,
        ..SyncOptions::default()
    };
    synchronize_attributes(&setup.doc, setup.definition, options).unwrap();

    assert_eq!(
        instance_attributes(&setup.doc, reference),
        vec![("TAG1".to_string(), "D1".to_string())]
    );
}

#[test]
fn refreshed_attributes_pick_up_definition_changes() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    set_attribute_value(&setup.doc, reference, "TAG1", "Room 101");

    // The definition's text height changes
    let children = setup
        .doc
        .block_children_by_class(setup.definition)
        .unwrap();
    let attdef = children["AcDbAttributeDefinition"][0];
    let mut tx = setup.doc.begin();
    tx.modify(attdef, |obj| {
        if let DbObject::Entity(EntityType::AttributeDefinition(attdef)) = obj {
            attdef.height = 7.5;
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    let attribs = instance_attribute_entities(&setup.doc, reference);
    assert_eq!(attribs.len(), 1);
    assert_eq!(attribs[0].height, 7.5);
    assert_eq!(attribs[0].value, "Room 101");
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[test]
fn materialized_attributes_follow_the_reference_placement() {
    let doc = acadext::CadDocument::new();
    let mut tx = doc.begin();
    let definition = tx
        .add_block_record(acadext::BlockRecord::new("DOOR"))
        .unwrap();
    tx.append_to_block(
        definition,
        EntityType::AttributeDefinition(
            AttributeDefinition::simple("TAG1").with_position(Vector3::new(1.0, 0.0, 0.0)),
        ),
    )
    .unwrap();
    let mut insert = Insert::new("DOOR", Vector3::new(100.0, 100.0, 0.0)).with_uniform_scale(2.0);
    insert.block_record = definition;
    let reference = tx.add_entity(EntityType::Insert(insert)).unwrap();
    tx.commit().unwrap();

    synchronize_attributes(&doc, definition, SyncOptions::default()).unwrap();

    let attribs = instance_attribute_entities(&doc, reference);
    assert_eq!(attribs.len(), 1);
    // (1, 0) scaled by 2 and translated to (100, 100)
    assert!((attribs[0].insertion_point.x - 102.0).abs() < 1e-10);
    assert!((attribs[0].insertion_point.y - 100.0).abs() < 1e-10);
    // Text height scales with the reference
    assert!((attribs[0].height - 5.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Name guard
// ---------------------------------------------------------------------------

#[test]
fn sync_skips_references_with_mismatched_names() {
    let setup = door_document(door_templates(), 2);
    let renamed = setup.references[0];

    let mut tx = setup.doc.begin();
    tx.modify(renamed, |obj| {
        if let DbObject::Entity(EntityType::Insert(insert)) = obj {
            insert.block_name = "WINDOW".to_string();
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(report.instances_visited, 1);
    assert_eq!(report.instances_skipped, 1);
    assert!(instance_tags(&setup.doc, renamed).is_empty());
    assert!(setup
        .doc
        .notifications()
        .has_type(NotificationType::Warning));
}

#[test]
fn name_guard_is_case_insensitive() {
    let setup = door_document(door_templates(), 1);
    let reference = setup.references[0];

    let mut tx = setup.doc.begin();
    tx.modify(reference, |obj| {
        if let DbObject::Entity(EntityType::Insert(insert)) = obj {
            insert.block_name = "door".to_string();
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    assert_eq!(report.instances_skipped, 0);
    assert_eq!(instance_tags(&setup.doc, reference), vec!["TAG1"]);
}

// ---------------------------------------------------------------------------
// Nesting
// ---------------------------------------------------------------------------

#[test]
fn direct_only_ignores_nested_references() {
    let setup = door_document(door_templates(), 1);
    let doc = &setup.doc;

    // A second block nests a DOOR reference inside itself
    let mut tx = doc.begin();
    let wall = tx.add_block_record(acadext::BlockRecord::new("WALL")).unwrap();
    let mut nested = Insert::new("DOOR", Vector3::ZERO);
    nested.block_record = setup.definition;
    let nested = tx
        .append_to_block(wall, EntityType::Insert(nested))
        .unwrap();
    tx.commit().unwrap();

    let options = SyncOptions {
        direct_only: true,
        ..SyncOptions::default()
    };
    let report = synchronize_attributes(doc, setup.definition, options).unwrap();
    assert_eq!(report.instances_visited, 1);
    assert!(instance_tags(doc, nested).is_empty());

    // Without the restriction the nested reference is reconciled too
    let report = synchronize_attributes(doc, setup.definition, SyncOptions::default()).unwrap();
    assert_eq!(report.instances_visited, 2);
    assert_eq!(instance_tags(doc, nested), vec!["TAG1"]);
}

// ---------------------------------------------------------------------------
// Dynamic blocks
// ---------------------------------------------------------------------------

#[test]
fn dynamic_sync_mirrors_templates_into_representations() {
    let setup = door_document(door_templates(), 0);
    let (representation, dynamic_reference) = add_dynamic_representation(&setup);

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(report.anonymous_synchronized, 1);
    // The representation mirrors every template, constants included
    let mut mirrored = definition_tags(&setup.doc, representation);
    mirrored.sort();
    assert_eq!(mirrored, vec!["TAG1", "TAG2"]);
    // The dynamic reference got its per-instance attribute
    assert_eq!(instance_tags(&setup.doc, dynamic_reference), vec!["TAG1"]);
}

#[test]
fn dynamic_sync_is_idempotent() {
    let setup = door_document(door_templates(), 0);
    let (representation, dynamic_reference) = add_dynamic_representation(&setup);

    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();
    let tags_before = definition_tags(&setup.doc, representation);
    let attrs_before = instance_attributes(&setup.doc, dynamic_reference);

    let report =
        synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    assert_eq!(report.attributes_added, 0);
    assert_eq!(definition_tags(&setup.doc, representation), tags_before);
    assert_eq!(
        instance_attributes(&setup.doc, dynamic_reference),
        attrs_before
    );
}

#[test]
fn dynamic_sync_updates_mirrored_template_properties() {
    let setup = door_document(door_templates(), 0);
    let (representation, _) = add_dynamic_representation(&setup);
    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    // Change the source definition's default value
    let children = setup
        .doc
        .block_children_by_class(setup.definition)
        .unwrap();
    let attdef = children["AcDbAttributeDefinition"][0];
    let mut tx = setup.doc.begin();
    tx.modify(attdef, |obj| {
        if let DbObject::Entity(EntityType::AttributeDefinition(attdef)) = obj {
            attdef.default_value = "D1-v2".to_string();
        }
        Ok(())
    })
    .unwrap();
    tx.commit().unwrap();

    synchronize_attributes(&setup.doc, setup.definition, SyncOptions::default()).unwrap();

    // The mirrored TAG1 in the representation carries the new default
    let tx = setup.doc.begin();
    let children = tx
        .read_block_record(representation, |record| record.entities.clone())
        .unwrap();
    let mut found = false;
    for child in children {
        if let Ok(Some(default_value)) = tx.read(child, |obj| match obj {
            DbObject::Entity(EntityType::AttributeDefinition(attdef)) if attdef.tag == "TAG1" => {
                Some(attdef.default_value.clone())
            }
            _ => None,
        }) {
            assert_eq!(default_value, "D1-v2");
            found = true;
        }
    }
    assert!(found);
}

// ---------------------------------------------------------------------------
// Preconditions and reporting
// ---------------------------------------------------------------------------

#[test]
fn sync_rejects_non_block_targets() {
    let setup = door_document(door_templates(), 1);
    let err = synchronize_attributes(&setup.doc, setup.references[0], SyncOptions::default())
        .unwrap_err();
    assert!(matches!(err, CadError::Precondition(_)));
}

#[test]
fn reports_merge_componentwise() {
    let mut total = SyncReport::default();
    total.merge(&SyncReport {
        instances_visited: 2,
        attributes_added: 1,
        ..SyncReport::default()
    });
    total.merge(&SyncReport {
        instances_visited: 1,
        attributes_removed: 3,
        ..SyncReport::default()
    });
    assert_eq!(total.instances_visited, 3);
    assert_eq!(total.attributes_added, 1);
    assert_eq!(total.attributes_removed, 3);
}
