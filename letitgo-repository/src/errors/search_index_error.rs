//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., a unit without an id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search engine or the request could not be sent.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to check for or create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// The index was created by someone else between the check and the create.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// A unit could not be encoded to its wire form.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The bulk request was rejected, or an item inside it failed.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
