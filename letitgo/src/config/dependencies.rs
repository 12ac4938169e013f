//! Dependency initialization and wiring for letitgo.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use letitgo_pipeline::{Decomposer, Ingestor, NodeIdPolicy};
use letitgo_repository::{OpenSearchClient, SearchIndexClient, SearchIndexProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured ingestor, shared by every command.
    pub ingestor: Ingestor,
}

impl Dependencies {
    /// Connect to OpenSearch and wire the pipeline.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the cluster is unreachable or unhealthy
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            node_id_policy = %settings.node_id_policy,
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(&settings.opensearch_url)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let deps = Self::with_provider(Arc::new(search_client), settings.node_id_policy);

        // Verify OpenSearch is reachable
        let healthy = deps
            .ingestor
            .client()
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(deps)
    }

    /// Wire the pipeline over an existing provider.
    pub fn with_provider(provider: Arc<dyn SearchIndexProvider>, policy: NodeIdPolicy) -> Self {
        let client = SearchIndexClient::new(provider);
        let ingestor = Ingestor::new(client, Decomposer::new(policy));
        Self { ingestor }
    }
}
