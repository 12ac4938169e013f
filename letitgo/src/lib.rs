//! # Letitgo
//!
//! Entry point library for the letitgo indexer: settings, dependency wiring
//! and the HTTP trigger server.

pub mod config;
pub mod server;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during startup or while serving.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] letitgo_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] letitgo_repository::SearchIndexError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A one-shot ingest left some units unindexed.
    #[error("{failed} of {total} units failed to index")]
    PartialFailure { failed: usize, total: usize },
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
