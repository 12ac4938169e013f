//! Loader module for the letitgo pipeline.
//!
//! Writes nodes and property records to their indices. One call is one bulk
//! request; there is no chunking and no retry.

use tracing::{info, instrument, warn};

use crate::errors::PipelineError;
use letitgo_repository::opensearch::{NODE_INDEX_NAME, PROPERTY_INDEX_NAME};
use letitgo_repository::{BatchOperationSummary, SearchIndexClient};
use letitgo_shared::{Doc, Node};

/// Writer that indexes units into the search engine.
#[derive(Clone)]
pub struct IndexWriter {
    client: SearchIndexClient,
    node_index: String,
    property_index: String,
}

impl IndexWriter {
    /// Create a writer targeting the default indices.
    pub fn new(client: SearchIndexClient) -> Self {
        Self::with_indices(client, NODE_INDEX_NAME, PROPERTY_INDEX_NAME)
    }

    /// Create a writer targeting custom index names.
    pub fn with_indices(
        client: SearchIndexClient,
        node_index: impl Into<String>,
        property_index: impl Into<String>,
    ) -> Self {
        Self {
            client,
            node_index: node_index.into(),
            property_index: property_index.into(),
        }
    }

    /// Save nodes, each under its own id.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-node results; check `failed` for partial failure
    /// * `Err(PipelineError)` - The bulk request could not be completed
    #[instrument(skip(self, nodes), fields(node_count = nodes.len()))]
    pub async fn save_nodes(&self, nodes: &[Node]) -> Result<BatchOperationSummary, PipelineError> {
        let summary = self.client.bulk_index(&self.node_index, nodes).await?;
        Self::log_summary(&self.node_index, &summary);
        Ok(summary)
    }

    /// Save one `property` record per property of the doc, under `property:<id>`.
    ///
    /// The doc is validated first; an invalid doc sends nothing.
    #[instrument(skip(self, doc), fields(doc_id = doc.id))]
    pub async fn create_records(&self, doc: &Doc) -> Result<BatchOperationSummary, PipelineError> {
        let records = doc.property_records()?;
        let summary = self.client.bulk_index(&self.property_index, &records).await?;
        Self::log_summary(&self.property_index, &summary);
        Ok(summary)
    }

    fn log_summary(index: &str, summary: &BatchOperationSummary) {
        if summary.is_complete() {
            info!(index = %index, indexed = summary.succeeded, "Bulk indexing completed");
        } else {
            warn!(
                index = %index,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk indexing completed with failures"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use letitgo_repository::{BulkRequest, BulkResponse, SearchIndexError, SearchIndexProvider};
    use letitgo_shared::{ElementType, Group, Kvs, Property};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Mock provider that accepts every item and records the payloads.
    #[derive(Default)]
    struct MockProvider {
        requests: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn index_exists(&self, _index: &str) -> Result<bool, SearchIndexError> {
            Ok(true)
        }

        async fn create_index(&self, _index: &str, _body: &Value) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn bulk(
            &self,
            index: &str,
            request: BulkRequest,
        ) -> Result<BulkResponse, SearchIndexError> {
            let items: Vec<Value> = request
                .ids()
                .iter()
                .map(|id| json!({"index": {"_id": id, "status": 201}}))
                .collect();
            self.requests
                .lock()
                .await
                .push((index.to_string(), request.to_ndjson()));
            serde_json::from_value(json!({"took": 1, "errors": false, "items": items}))
                .map_err(|e| SearchIndexError::parse(e.to_string()))
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn writer(provider: Arc<MockProvider>) -> IndexWriter {
        IndexWriter::new(SearchIndexClient::new(provider))
    }

    fn pci_doc() -> Doc {
        Doc {
            id: 1,
            name: "PCI".to_string(),
            groups: vec![Group {
                id: "1".to_string(),
                key: "patient".to_string(),
                name: "患者信息".to_string(),
                parent_key: None,
                properties: vec![
                    Property::new("2", "name", "姓名", ElementType::Text),
                    Property::new("3", "gender", "性别", ElementType::Keyword),
                    Property::new("4", "age", "年龄", ElementType::Long),
                    Property::new("5", "birthday", "出生日期", ElementType::Date),
                ],
            }],
        }
    }

    #[tokio::test]
    async fn test_save_nodes_uses_node_ids() {
        let provider = Arc::new(MockProvider::default());
        let nodes = vec![
            Node::new("g", "n-1", "vitals", Kvs::new()),
            Node::new("g", "n-2", "vitals", Kvs::new()),
        ];

        let summary = writer(provider.clone()).save_nodes(&nodes).await.unwrap();
        assert_eq!(summary.succeeded, 2);

        let requests = provider.requests.lock().await;
        assert_eq!(requests.len(), 1);
        let (index, payload) = &requests[0];
        assert_eq!(index, "letitgo");

        let lines: Vec<Value> = payload
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0], json!({"index": {"_id": "n-1"}}));
        assert_eq!(lines[1]["groupk"], "vitals");
        assert_eq!(lines[2], json!({"index": {"_id": "n-2"}}));
    }

    #[tokio::test]
    async fn test_create_records_writes_property_records() {
        let provider = Arc::new(MockProvider::default());

        let summary = writer(provider.clone())
            .create_records(&pci_doc())
            .await
            .unwrap();
        assert_eq!(summary.total, 4);

        let requests = provider.requests.lock().await;
        let (index, payload) = &requests[0];
        assert_eq!(index, "letitgo-property");

        let lines: Vec<Value> = payload
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 8);
        for (pair, id) in lines.chunks(2).zip(["2", "3", "4", "5"]) {
            assert_eq!(pair[0]["index"]["_id"], format!("property:{}", id));
            assert_eq!(pair[1]["type"], "property");
            assert_eq!(pair[1]["property"]["id"], id);
        }
    }

    #[tokio::test]
    async fn test_create_records_rejects_invalid_doc() {
        let provider = Arc::new(MockProvider::default());
        let mut doc = pci_doc();
        doc.groups[0]
            .properties
            .push(Property::new("2", "dup", "重复", ElementType::Keyword));

        let result = writer(provider.clone()).create_records(&doc).await;

        assert!(matches!(result, Err(PipelineError::ModelError(_))));
        assert!(provider.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_index_names() {
        let provider = Arc::new(MockProvider::default());
        let writer = IndexWriter::with_indices(
            SearchIndexClient::new(provider.clone()),
            "nodes-test",
            "props-test",
        );

        writer
            .save_nodes(&[Node::new("g", "n", "k", Kvs::new())])
            .await
            .unwrap();

        assert_eq!(provider.requests.lock().await[0].0, "nodes-test");
    }
}
