//! # acadext
//!
//! Extension utilities for CAD object databases: a transactional,
//! handle-addressed object store with runtime class filtering, block
//! attribute synchronization and per-object extension data.
//!
//! ## Features
//!
//! - Handle-addressed object store with soft erase and nested,
//!   independently committed transactions
//! - Runtime class tree ("AcDb…") with memoized capability checks
//! - Block attribute synchronization, including dynamic blocks and
//!   their anonymous representation records
//! - Per-object extension data stored as xrecords under an extension
//!   dictionary
//!
//! ## Quick Start
//!
//! ```rust
//! use acadext::{CadDocument, BlockRecord, EntityType, AttributeDefinition, Insert};
//! use acadext::types::Vector3;
//! use acadext::sync::{synchronize_attributes, SyncOptions};
//!
//! let doc = CadDocument::new();
//!
//! // Define a block with an attribute and reference it
//! let mut tx = doc.begin();
//! let door = tx.add_block_record(BlockRecord::new("DOOR"))?;
//! tx.append_to_block(
//!     door,
//!     EntityType::AttributeDefinition(AttributeDefinition::simple("NUMBER")),
//! )?;
//! let mut insert = Insert::new("DOOR", Vector3::new(10.0, 0.0, 0.0));
//! insert.block_record = door;
//! tx.add_entity(EntityType::Insert(insert))?;
//! tx.commit()?;
//!
//! // Bring every reference's attributes in line with the definition
//! let report = synchronize_attributes(&doc, door, SyncOptions::default())?;
//! assert_eq!(report.attributes_added, 1);
//! # Ok::<(), acadext::error::CadError>(())
//! ```
//!
//! ## Architecture
//!
//! The library uses a trait-based design:
//!
//! - `Entity` - Trait for graphical entities
//! - `Curve` - Trait for curve entities with geometric queries
//! - `TableEntry` - Trait for table entries
//! - `CadDocument` - Central document structure; `begin()` opens a
//!   transaction for reads and writes

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classes;
pub mod document;
pub mod entities;
pub mod error;
pub mod notification;
pub mod objects;
pub mod sync;
pub mod tables;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use error::{CadError, Result};
pub use types::{Color, Handle, LineWeight, Tolerance, Transparency, Vector2, Vector3};

// Re-export entity types
pub use entities::{
    AttributeDefinition, AttributeEntity, Curve, Entity, EntityType, Insert, Line, Ray, XLine,
};

// Re-export table types
pub use tables::{BlockRecord, SymbolTable, TableEntry};

// Re-export objects
pub use objects::{Dictionary, ObjectType, XRecord, XRecordEntry, XRecordValue};

// Re-export document and transaction
pub use document::{CadDocument, DbObject, WorkingDocumentSwitcher};
pub use transaction::Transaction;

// Re-export synchronization entry points
pub use sync::{synchronize_attributes, SyncOptions, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
