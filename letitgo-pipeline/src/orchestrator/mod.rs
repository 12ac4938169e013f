//! Orchestrator module for the letitgo pipeline.
//!
//! Coordinates provisioning, decomposition and loading. Each ingest call is
//! independent and may run concurrently with others.

use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::loader::IndexWriter;
use crate::processor::Decomposer;
use letitgo_repository::{BatchOperationSummary, IndexConfig, SearchIndexClient};
use letitgo_shared::{Doc, Origin};

/// Outcome of ingesting one origin.
#[derive(Debug, Clone)]
pub struct OriginReport {
    /// Group id shared by the origin's nodes, if any node was produced.
    pub gid: Option<String>,
    /// Per-node write results.
    pub summary: BatchOperationSummary,
}

/// Drives one origin or doc from decomposition to the index.
#[derive(Clone)]
pub struct Ingestor {
    client: SearchIndexClient,
    decomposer: Decomposer,
    writer: IndexWriter,
    node_index: IndexConfig,
    property_index: IndexConfig,
}

impl Ingestor {
    /// Create an ingestor over the default indices.
    pub fn new(client: SearchIndexClient, decomposer: Decomposer) -> Self {
        Self::with_indices(
            client,
            decomposer,
            IndexConfig::nodes(),
            IndexConfig::properties(),
        )
    }

    /// Create an ingestor over custom index configurations.
    pub fn with_indices(
        client: SearchIndexClient,
        decomposer: Decomposer,
        node_index: IndexConfig,
        property_index: IndexConfig,
    ) -> Self {
        let writer = IndexWriter::with_indices(
            client.clone(),
            node_index.name.clone(),
            property_index.name.clone(),
        );
        Self {
            client,
            decomposer,
            writer,
            node_index,
            property_index,
        }
    }

    /// Ensure both indices exist. Must succeed before anything is written.
    #[instrument(skip(self))]
    pub async fn provision(&self) -> Result<(), PipelineError> {
        for config in [&self.node_index, &self.property_index] {
            let outcome = self.client.ensure_index(config).await?;
            info!(index = %config.name, outcome = ?outcome, "Index ready");
        }
        Ok(())
    }

    /// Decompose an origin and write its nodes.
    #[instrument(skip(self, origin), fields(source_id = %origin.source_id))]
    pub async fn ingest_origin(&self, origin: &Origin) -> Result<OriginReport, PipelineError> {
        let nodes = self.decomposer.parse_nodes(origin)?;
        let gid = nodes.first().map(|n| n.gid.clone());
        let summary = self.writer.save_nodes(&nodes).await?;
        Ok(OriginReport { gid, summary })
    }

    /// Write the property records of a doc.
    #[instrument(skip(self, doc), fields(doc_id = doc.id))]
    pub async fn ingest_doc(&self, doc: &Doc) -> Result<BatchOperationSummary, PipelineError> {
        self.writer.create_records(doc).await
    }

    pub fn client(&self) -> &SearchIndexClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::NodeIdPolicy;
    use async_trait::async_trait;
    use letitgo_repository::{BulkRequest, BulkResponse, SearchIndexError, SearchIndexProvider};
    use letitgo_shared::Kvs;
    use serde_json::{json, Value};
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// In-memory index: stores documents by id so overwrites are visible.
    #[derive(Default)]
    struct InMemoryProvider {
        indices: Mutex<HashSet<String>>,
        documents: Mutex<HashMap<String, HashMap<String, Value>>>,
        create_calls: AtomicUsize,
        bulk_calls: AtomicUsize,
        fail_exists: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for InMemoryProvider {
        async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
            if self.fail_exists {
                return Err(SearchIndexError::connection("cluster unreachable"));
            }
            Ok(self.indices.lock().await.contains(index))
        }

        async fn create_index(&self, index: &str, _body: &Value) -> Result<(), SearchIndexError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.indices.lock().await.insert(index.to_string());
            Ok(())
        }

        async fn bulk(
            &self,
            index: &str,
            request: BulkRequest,
        ) -> Result<BulkResponse, SearchIndexError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            let mut documents = self.documents.lock().await;
            let stored = documents.entry(index.to_string()).or_default();

            let mut items = Vec::new();
            for (id, pair) in request.ids().iter().zip(request.lines().chunks(2)) {
                let body: Value = serde_json::from_str(&pair[1])
                    .map_err(|e| SearchIndexError::parse(e.to_string()))?;
                stored.insert(id.clone(), body);
                items.push(json!({"index": {"_id": id, "status": 201}}));
            }

            serde_json::from_value(json!({"took": 1, "errors": false, "items": items}))
                .map_err(|e| SearchIndexError::parse(e.to_string()))
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn kvs(value: Value) -> Kvs {
        value.as_object().cloned().unwrap()
    }

    fn origin() -> Origin {
        let mut docs = BTreeMap::new();
        docs.insert(
            "vitals".to_string(),
            vec![kvs(json!({"temp": 37.1})), kvs(json!({"temp": 36.9}))],
        );
        docs.insert("labs".to_string(), vec![]);
        Origin {
            source_code: "emr".to_string(),
            source_id: "ip-42".to_string(),
            docs,
            ..Default::default()
        }
    }

    fn ingestor(provider: Arc<InMemoryProvider>, policy: NodeIdPolicy) -> Ingestor {
        Ingestor::new(SearchIndexClient::new(provider), Decomposer::new(policy))
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);

        ingestor.provision().await.unwrap();
        ingestor.provision().await.unwrap();

        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 2);
        let indices = provider.indices.lock().await;
        assert!(indices.contains("letitgo"));
        assert!(indices.contains("letitgo-property"));
    }

    #[tokio::test]
    async fn test_provision_failure_is_reported() {
        let provider = Arc::new(InMemoryProvider {
            fail_exists: true,
            ..Default::default()
        });
        let ingestor = ingestor(provider, NodeIdPolicy::Random);

        let result = ingestor.provision().await;
        assert!(matches!(result, Err(PipelineError::SearchIndexError(_))));
    }

    #[tokio::test]
    async fn test_ingest_origin_writes_all_nodes() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);

        let report = ingestor.ingest_origin(&origin()).await.unwrap();

        assert_eq!(report.summary.succeeded, 2);
        let gid = report.gid.unwrap();
        let documents = provider.documents.lock().await;
        let stored = &documents["letitgo"];
        assert_eq!(stored.len(), 2);
        assert!(stored.values().all(|d| d["gid"] == gid.as_str()));
    }

    #[tokio::test]
    async fn test_deterministic_reingest_overwrites() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Deterministic);

        ingestor.ingest_origin(&origin()).await.unwrap();
        ingestor.ingest_origin(&origin()).await.unwrap();

        assert_eq!(provider.documents.lock().await["letitgo"].len(), 2);
    }

    #[tokio::test]
    async fn test_random_reingest_duplicates() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);

        ingestor.ingest_origin(&origin()).await.unwrap();
        ingestor.ingest_origin(&origin()).await.unwrap();

        assert_eq!(provider.documents.lock().await["letitgo"].len(), 4);
    }

    #[tokio::test]
    async fn test_empty_origin_sends_nothing() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);

        let report = ingestor.ingest_origin(&Origin::default()).await.unwrap();

        assert!(report.gid.is_none());
        assert_eq!(report.summary.total, 0);
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_ingests_are_isolated() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ingestor = ingestor.clone();
                tokio::spawn(async move { ingestor.ingest_origin(&origin()).await })
            })
            .collect();

        let mut gids = HashSet::new();
        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            gids.insert(report.gid.unwrap());
        }

        assert_eq!(gids.len(), 4);
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 4);
        assert_eq!(provider.documents.lock().await["letitgo"].len(), 8);
    }

    #[tokio::test]
    async fn test_ingest_doc_stable_ids() {
        let provider = Arc::new(InMemoryProvider::default());
        let ingestor = ingestor(provider.clone(), NodeIdPolicy::Random);
        let doc: Doc = serde_json::from_value(json!({
            "id": 1,
            "name": "PCI",
            "groups": [{"id": "1", "key": "patient", "name": "患者信息", "properties": [
                {"id": "2", "key": "name", "name": "姓名", "etype": "text"},
                {"id": "3", "key": "gender", "name": "性别", "etype": "keyword"}
            ]}]
        }))
        .unwrap();

        ingestor.ingest_doc(&doc).await.unwrap();
        ingestor.ingest_doc(&doc).await.unwrap();

        let documents = provider.documents.lock().await;
        let stored = &documents["letitgo-property"];
        assert_eq!(stored.len(), 2);
        assert!(stored.contains_key("property:2"));
        assert!(stored.contains_key("property:3"));
    }
}
