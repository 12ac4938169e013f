//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend, plus the fixed index mappings.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{IndexConfig, NODE_INDEX_NAME, PROPERTY_INDEX_NAME};
