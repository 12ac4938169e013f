//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses it to provision indices and to write units in bulk.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::bulk::BulkRequest;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::IndexConfig;
use crate::types::{BatchOperationResult, BatchOperationSummary, EnsureIndexOutcome};
use letitgo_shared::BulkDocument;

/// The main client for interacting with the search index.
///
/// Cheap to clone; all clones share one provider.
#[derive(Clone)]
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient over an already constructed provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Make sure an index exists, creating it with the configured mapping if not.
    ///
    /// Safe to call repeatedly. A create that loses a race with another
    /// process counts as `AlreadyExists`.
    #[instrument(skip(self, config), fields(index = %config.name))]
    pub async fn ensure_index(
        &self,
        config: &IndexConfig,
    ) -> Result<EnsureIndexOutcome, SearchIndexError> {
        if self.provider.index_exists(&config.name).await? {
            debug!("Index already exists");
            return Ok(EnsureIndexOutcome::AlreadyExists);
        }

        info!("Index does not exist, creating it with default mapping");
        match self.provider.create_index(&config.name, &config.body).await {
            Ok(()) => {
                info!("Index created successfully");
                Ok(EnsureIndexOutcome::Created)
            }
            Err(SearchIndexError::IndexAlreadyExists(_)) => {
                debug!("Index was created concurrently");
                Ok(EnsureIndexOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// Write units to an index as one bulk request.
    ///
    /// Each unit is stored under its `document_id`. Units that have an empty
    /// id or fail to serialize are reported as failed and not sent; the rest
    /// of the batch still goes out. An empty batch sends nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-unit results, possibly with failures
    /// * `Err(SearchIndexError)` - The request could not be sent or was rejected as a whole
    #[instrument(skip(self, units), fields(units = units.len()))]
    pub async fn bulk_index<T>(
        &self,
        index: &str,
        units: &[T],
    ) -> Result<BatchOperationSummary, SearchIndexError>
    where
        T: BulkDocument + Sync,
    {
        let mut request = BulkRequest::new();
        let mut rejected = Vec::new();

        for unit in units {
            let id = unit.document_id();
            if id.is_empty() {
                rejected.push(BatchOperationResult::failure(
                    id,
                    SearchIndexError::validation("unit has an empty document id"),
                ));
                continue;
            }
            if let Err(e) = request.push_index(&id, unit) {
                warn!(id = %id, error = %e, "Cannot encode unit");
                rejected.push(BatchOperationResult::failure(
                    id,
                    SearchIndexError::serialization(e.to_string()),
                ));
            }
        }

        let mut results = Vec::with_capacity(units.len());
        if !request.is_empty() {
            let sent_ids = request.ids().to_vec();
            let response = self.provider.bulk(index, request).await?;
            debug!(took = response.took, errors = response.errors, "Bulk response received");
            results.extend(response.into_results(&sent_ids));
        }
        results.extend(rejected);

        let summary = BatchOperationSummary::from_results(results);
        for (id, error) in summary.failures() {
            warn!(
                index = %index,
                id = %id,
                error = %error.map(ToString::to_string).unwrap_or_default(),
                "Unit was not indexed"
            );
        }

        Ok(summary)
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}
