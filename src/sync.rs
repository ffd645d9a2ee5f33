//! Attribute synchronization
//!
//! After a block definition's attribute definitions change, existing
//! references still carry the old attribute set. `synchronize_attributes`
//! walks the references and reconciles each one: missing attributes are
//! materialized from their definitions, surviving ones are refreshed in
//! place (keeping the user-entered value), and stray ones are removed.
//! Dynamic block definitions additionally propagate their templates into
//! the anonymous representation records, which are then synchronized in
//! turn.

use crate::document::{CadDocument, DbObject};
use crate::entities::{AttributeDefinition, AttributeEntity, EntityType};
use crate::error::{CadError, Result};
use crate::notification::NotificationType;
use crate::transaction::Transaction;
use crate::types::{Handle, Vector3};
use ahash::AHashSet;
use indexmap::IndexMap;

/// Options controlling a synchronization run
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Only touch references placed directly in model or paper space
    pub direct_only: bool,
    /// Remove attributes whose tag no longer has a definition
    pub remove_superfluous: bool,
    /// Discard per-instance values and reapply the defaults
    pub reset_to_default: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            direct_only: false,
            remove_superfluous: true,
            reset_to_default: false,
        }
    }
}

/// Tally of what a synchronization run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// References examined and reconciled
    pub instances_visited: usize,
    /// Attributes materialized from a definition
    pub attributes_added: usize,
    /// Existing attributes refreshed in place
    pub attributes_refreshed: usize,
    /// Stray attributes erased
    pub attributes_removed: usize,
    /// References skipped because of a block name mismatch
    pub instances_skipped: usize,
    /// Anonymous representation records synchronized recursively
    pub anonymous_synchronized: usize,
}

impl SyncReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: &SyncReport) {
        self.instances_visited += other.instances_visited;
        self.attributes_added += other.attributes_added;
        self.attributes_refreshed += other.attributes_refreshed;
        self.attributes_removed += other.attributes_removed;
        self.instances_skipped += other.instances_skipped;
        self.anonymous_synchronized += other.anonymous_synchronized;
    }
}

/// A template captured from a block definition
#[derive(Debug, Clone)]
struct Template {
    handle: Handle,
    attdef: AttributeDefinition,
}

/// Placement data captured from one block reference
#[derive(Debug, Clone)]
struct Placement {
    insert_point: Vector3,
    scale: Vector3,
    rotation: f64,
}

/// Reconcile the attributes of every reference of a block definition
///
/// Runs in two independently committed scopes: instance reconciliation
/// first, then definition bookkeeping and dynamic-block propagation.
/// A failure in the second scope therefore cannot undo the first.
pub fn synchronize_attributes(
    doc: &CadDocument,
    definition: Handle,
    options: SyncOptions,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let (definition_name, templates) = capture_templates(doc, definition)?;
    let references = doc.references_of(definition, options.direct_only)?;

    let mut tx = doc.begin();
    for reference in references {
        report.merge(&reconcile_instance(
            &mut tx,
            doc,
            reference,
            &definition_name,
            &templates,
            options,
        )?);
    }
    tx.commit()?;

    let mut tx = doc.begin();
    let has_live_templates = !templates.is_empty();
    tx.modify(definition, |obj| match obj {
        DbObject::BlockRecord(record) => {
            record.flags.has_attributes = has_live_templates;
            Ok(())
        }
        _ => Err(CadError::Precondition(format!(
            "handle {:#X} is not a block record",
            definition.value()
        ))),
    })?;

    let is_dynamic = tx.read_block_record(definition, |r| r.is_dynamic())?;
    let anonymous = if is_dynamic {
        doc.anonymous_definitions_of(definition)?
    } else {
        Vec::new()
    };
    for &anon in &anonymous {
        mirror_templates(&mut tx, anon, &templates)?;
    }
    tx.commit()?;

    // Anonymous representations are not dynamic themselves, so this
    // recursion bottoms out after one level.
    for anon in anonymous {
        let nested = synchronize_attributes(doc, anon, options)?;
        report.merge(&nested);
        report.anonymous_synchronized += 1;
    }

    Ok(report)
}

/// Collect the definition's effective name and attribute templates
///
/// Tags are keyed uppercase; a later definition with a duplicate tag
/// shadows the earlier one. For an anonymous representation the
/// effective name is the named source definition's name.
fn capture_templates(
    doc: &CadDocument,
    definition: Handle,
) -> Result<(String, IndexMap<String, Template>)> {
    let tx = doc.begin();
    let (name, source, children) = tx
        .read_block_record(definition, |record| {
            (
                record.name.clone(),
                if record.is_dynamic_representation() {
                    record.dynamic_source
                } else {
                    Handle::NULL
                },
                record.entities.clone(),
            )
        })
        .map_err(|err| {
            CadError::Precondition(format!(
                "cannot synchronize attributes of {:#X}: {}",
                definition.value(),
                err
            ))
        })?;
    let name = if source.is_valid() {
        tx.read_block_record(source, |record| record.name.clone())?
    } else {
        name
    };

    let mut templates = IndexMap::new();
    for child in children {
        let attdef = match tx.read(child, |obj| match obj {
            DbObject::Entity(EntityType::AttributeDefinition(attdef)) => Some(attdef.clone()),
            _ => None,
        }) {
            Ok(Some(attdef)) => attdef,
            Ok(None) => continue,
            Err(CadError::ObjectErased(_)) => continue,
            Err(err) => return Err(err),
        };
        templates.insert(
            attdef.tag.to_uppercase(),
            Template {
                handle: child,
                attdef,
            },
        );
    }
    Ok((name, templates))
}

/// Reconcile one block reference against the definition's templates
fn reconcile_instance(
    tx: &mut Transaction,
    doc: &CadDocument,
    reference: Handle,
    definition_name: &str,
    templates: &IndexMap<String, Template>,
    options: SyncOptions,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let (block_name, owned, placement) = tx.read(reference, |obj| match obj {
        DbObject::Entity(EntityType::Insert(insert)) => Some((
            insert.block_name.clone(),
            insert.attributes.clone(),
            Placement {
                insert_point: insert.insert_point,
                scale: insert.scale(),
                rotation: insert.rotation,
            },
        )),
        _ => None,
    })?
    .ok_or_else(|| {
        CadError::Precondition(format!(
            "handle {:#X} is not a block reference",
            reference.value()
        ))
    })?;

    // A reference whose recorded name diverged from the definition is
    // someone else's problem; flag it and move on.
    if !block_name.eq_ignore_ascii_case(definition_name) {
        doc.notify(
            NotificationType::Warning,
            format!(
                "skipped block reference {:#X}: its name \"{}\" does not match \"{}\"",
                reference.value(),
                block_name,
                definition_name
            ),
        );
        report.instances_skipped += 1;
        return Ok(report);
    }

    let mut kept: Vec<Handle> = Vec::new();
    let mut seen: AHashSet<String> = AHashSet::new();

    for handle in owned {
        let attrib = match tx.read(handle, |obj| match obj {
            DbObject::Entity(EntityType::AttributeEntity(attrib)) => Some(attrib.clone()),
            _ => None,
        }) {
            Ok(Some(attrib)) => attrib,
            Ok(None) => continue,
            Err(CadError::ObjectErased(_)) => continue,
            Err(err) => return Err(err),
        };
        let tag_key = attrib.tag.to_uppercase();

        // A tag backed only by a constant template counts as superfluous:
        // constants never have per-instance attributes.
        match templates.get(&tag_key).filter(|t| !t.attdef.is_constant()) {
            Some(template) => {
                let value = if options.reset_to_default {
                    None
                } else {
                    Some(attrib.value.clone())
                };
                let mut refreshed = AttributeEntity::from_definition(&template.attdef, value);
                refreshed.apply_insert_transform(
                    placement.insert_point,
                    placement.scale,
                    placement.rotation,
                );
                refreshed.common.handle = attrib.common.handle;
                refreshed.common.owner = attrib.common.owner;
                refreshed.common.extension_dictionary = attrib.common.extension_dictionary;
                refreshed.attdef_handle = template.handle;
                tx.modify(handle, move |obj| {
                    *obj = DbObject::Entity(EntityType::AttributeEntity(refreshed));
                    Ok(())
                })?;
                kept.push(handle);
                seen.insert(tag_key);
                report.attributes_refreshed += 1;
            }
            None => {
                if options.remove_superfluous {
                    tx.erase(handle)?;
                    report.attributes_removed += 1;
                } else {
                    kept.push(handle);
                }
            }
        }
    }

    // Constant definitions never materialize per-instance attributes
    for (tag_key, template) in templates {
        if template.attdef.is_constant() || seen.contains(tag_key) {
            continue;
        }
        let mut attrib = AttributeEntity::from_definition(&template.attdef, None);
        attrib.apply_insert_transform(placement.insert_point, placement.scale, placement.rotation);
        attrib.common.owner = reference;
        attrib.attdef_handle = template.handle;
        let handle = tx.add_entity(EntityType::AttributeEntity(attrib))?;
        kept.push(handle);
        report.attributes_added += 1;
    }

    tx.modify(reference, move |obj| match obj {
        DbObject::Entity(EntityType::Insert(insert)) => {
            insert.attributes = kept;
            Ok(())
        }
        _ => Err(CadError::Precondition(
            "block reference changed type mid-sync".to_string(),
        )),
    })?;

    report.instances_visited += 1;
    Ok(report)
}

/// Mirror a definition's attribute templates into an anonymous record
///
/// Unlike instance reconciliation this copies every template, constant
/// ones included, because the representation record stands in for the
/// full definition.
fn mirror_templates(
    tx: &mut Transaction,
    anonymous: Handle,
    templates: &IndexMap<String, Template>,
) -> Result<()> {
    let children = tx.read_block_record(anonymous, |record| record.entities.clone())?;

    let mut present: IndexMap<String, Handle> = IndexMap::new();
    for child in children {
        let tag = match tx.read(child, |obj| match obj {
            DbObject::Entity(EntityType::AttributeDefinition(attdef)) => Some(attdef.tag.clone()),
            _ => None,
        }) {
            Ok(Some(tag)) => tag,
            Ok(None) => continue,
            Err(CadError::ObjectErased(_)) => continue,
            Err(err) => return Err(err),
        };
        present.insert(tag.to_uppercase(), child);
    }

    for (tag_key, template) in templates {
        match present.get(tag_key) {
            Some(&child) => {
                let source = template.attdef.clone();
                tx.modify(child, move |obj| match obj {
                    DbObject::Entity(EntityType::AttributeDefinition(attdef)) => {
                        copy_template_fields(attdef, &source);
                        Ok(())
                    }
                    _ => Err(CadError::Precondition(
                        "attribute definition changed type mid-sync".to_string(),
                    )),
                })?;
            }
            None => {
                let mut attdef = template.attdef.clone();
                attdef.common.handle = Handle::NULL;
                attdef.common.owner = Handle::NULL;
                attdef.common.extension_dictionary = Handle::NULL;
                tx.append_to_block(anonymous, EntityType::AttributeDefinition(attdef))?;
            }
        }
    }

    for (tag_key, &child) in &present {
        if !templates.contains_key(tag_key) {
            tx.erase(child)?;
        }
    }

    Ok(())
}

/// Copy a template's display and value properties onto another template
///
/// The destination's anchor points are preserved: the representation
/// record may place the attribute elsewhere (a moved grip, for
/// instance) and that placement is authoritative.
fn copy_template_fields(dst: &mut AttributeDefinition, src: &AttributeDefinition) {
    dst.prompt = src.prompt.clone();
    dst.default_value = src.default_value.clone();
    dst.height = src.height;
    dst.rotation = src.rotation;
    dst.width_factor = src.width_factor;
    dst.oblique_angle = src.oblique_angle;
    dst.text_style = src.text_style.clone();
    dst.text_generation_flags = src.text_generation_flags;
    dst.horizontal_alignment = src.horizontal_alignment;
    dst.vertical_alignment = src.vertical_alignment;
    dst.flags = src.flags;
    dst.field_length = src.field_length;
    dst.normal = src.normal;
    dst.mtext_flag = src.mtext_flag;
    dst.lock_position = src.lock_position;
    dst.common.layer = src.common.layer.clone();
    dst.common.color = src.common.color;
}
