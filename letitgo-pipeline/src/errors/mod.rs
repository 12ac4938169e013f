//! Error types for the letitgo pipeline.

use letitgo_repository::SearchIndexError;
use letitgo_shared::ModelError;
use thiserror::Error;

/// Errors that can occur in the letitgo pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A document violated a model invariant.
    #[error("Model error: {0}")]
    ModelError(#[from] ModelError),

    /// Error from the search index.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),

    /// Failed to read or decode producer input.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Input that cannot be processed under the current settings.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PipelineError {
    /// Create a source error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
