//! Validation errors for the document model.

use thiserror::Error;

/// Errors raised when a document violates the model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Two properties in one doc share an id.
    #[error("Duplicate property id: {0}")]
    DuplicatePropertyId(String),

    /// Two groups in one doc share a key.
    #[error("Duplicate group key: {0}")]
    DuplicateGroupKey(String),

    /// A group names a parent that is not part of the doc.
    #[error("Group {group} references unknown parent group {parent}")]
    UnknownParentGroup { group: String, parent: String },
}
