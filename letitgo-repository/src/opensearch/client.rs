//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::bulk::{BulkRequest, BulkResponse};
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;

/// OpenSearch client implementation.
///
/// Holds a single long-lived transport. Construct it once at startup and share
/// it behind an `Arc`; the underlying connection pool is safe for concurrent use.
///
/// # Example
///
/// ```ignore
/// let provider = OpenSearchClient::new("http://localhost:9200").await?;
/// let client = SearchIndexClient::new(Arc::new(provider));
/// client.ensure_index(&IndexConfig::nodes()).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// No request is sent; an unreachable cluster surfaces on first use.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code().as_u16();
        let body = match status {
            200 | 404 => String::new(),
            _ => response.text().await.unwrap_or_default(),
        };
        exists_from_status(index, status, &body)
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        create_failure(index, status.as_u16(), &body)
    }

    #[instrument(skip(self, request), fields(units = request.len()))]
    async fn bulk(
        &self,
        index: &str,
        request: BulkRequest,
    ) -> Result<BulkResponse, SearchIndexError> {
        debug!(payload = %request.to_ndjson(), "Sending bulk request");

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(request.into_lines())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<BulkResponse>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Ok(cluster_is_healthy(&body))
    }
}

/// Map the status of an index exists check. `body` is only read on failure.
fn exists_from_status(index: &str, status: u16, body: &str) -> Result<bool, SearchIndexError> {
    match status {
        200 => Ok(true),
        404 => Ok(false),
        _ => {
            error!(index = %index, status = status, body = %body, "Index exists check failed");
            Err(SearchIndexError::index_creation(format!(
                "Exists check for {} failed with status {}: {}",
                index, status, body
            )))
        }
    }
}

/// Map a failed create. A lost race with another creator is `IndexAlreadyExists`.
fn create_failure(index: &str, status: u16, body: &str) -> Result<(), SearchIndexError> {
    if body.contains("resource_already_exists_exception") {
        return Err(SearchIndexError::IndexAlreadyExists(index.to_string()));
    }
    error!(index = %index, status = status, body = %body, "Create index failed");
    Err(SearchIndexError::index_creation(format!(
        "Cannot create index {} (status {}): {}",
        index, status, body
    )))
}

fn cluster_is_healthy(body: &Value) -> bool {
    let status = body["status"].as_str().unwrap_or("red");
    debug!(status = %status, "Cluster health");
    status != "red"
}
