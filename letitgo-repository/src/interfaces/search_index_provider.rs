//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::bulk::{BulkRequest, BulkResponse};
use crate::errors::SearchIndexError;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are constructed once by the process entry point and shared
/// through `SearchIndexClient`, so they must be safe to use from concurrent tasks.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether an index with the given name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index exists
    /// * `Ok(false)` - The index does not exist
    /// * `Err(SearchIndexError)` - The check itself failed
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and mappings.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index was created
    /// * `Err(SearchIndexError::IndexAlreadyExists)` - Another caller created it first
    /// * `Err(SearchIndexError)` - Creation failed
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError>;

    /// Submit a bulk request against an index as a single wire request.
    ///
    /// A transport failure or a non-success status is an error. Per-item
    /// failures are returned inside the `BulkResponse`.
    async fn bulk(
        &self,
        index: &str,
        request: BulkRequest,
    ) -> Result<BulkResponse, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
