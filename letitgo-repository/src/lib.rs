//! # Letitgo Repository
//!
//! This crate provides the search index seam for letitgo. It includes the
//! error types, the provider trait, the bulk wire protocol, and a concrete
//! implementation for OpenSearch.

pub mod bulk;
pub mod client;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use bulk::{BulkRequest, BulkResponse};
pub use client::SearchIndexClient;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{IndexConfig, OpenSearchClient};
pub use types::{BatchOperationResult, BatchOperationSummary, EnsureIndexOutcome};
