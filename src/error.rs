//! Error types for acadext operations

use thiserror::Error;

/// Main error type for acadext operations
#[derive(Debug, Error)]
pub enum CadError {
    /// A required argument or object was missing; the whole operation aborts
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Bad call arguments (null-equivalent key or empty payload)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle does not address any object in the document
    #[error("object not found: handle {0:#X}")]
    ObjectNotFound(u64),

    /// Handle addresses an erased object
    #[error("object erased: handle {0:#X}")]
    ObjectErased(u64),

    /// Capability name is not registered in the runtime class tree
    #[error("unknown runtime class: {0}")]
    UnknownClass(String),

    /// Table entry with the same name already exists
    #[error("duplicate table entry: {0}")]
    DuplicateEntry(String),

    /// Transaction was already committed or aborted
    #[error("transaction is not open")]
    TransactionClosed,

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for acadext operations
pub type Result<T> = std::result::Result<T, CadError>;

impl From<String> for CadError {
    fn from(s: String) -> Self {
        CadError::Custom(s)
    }
}

impl From<&str> for CadError {
    fn from(s: &str) -> Self {
        CadError::Custom(s.to_string())
    }
}
