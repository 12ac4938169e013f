//! HTTP trigger server.

pub mod handlers;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use letitgo_pipeline::Ingestor;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Ingestor,
}

/// Build the router.
pub fn router(ingestor: Ingestor, disable_router_log: bool) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/origins", post(handlers::origin_handler))
        .route("/docs", post(handlers::doc_handler));

    let app = if disable_router_log {
        app
    } else {
        app.layer(axum::middleware::from_fn(middleware::log_request))
    };

    app.with_state(AppState { ingestor })
}

/// Bind and serve until Ctrl-C.
pub async fn serve(settings: &Settings, ingestor: Ingestor) -> Result<(), IndexingError> {
    let addr = settings.listen_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(addr = %addr, root_url = %settings.root_url, "Server is running");

    axum::serve(listener, router(ingestor, settings.disable_router_log))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use letitgo_pipeline::{Decomposer, NodeIdPolicy};
    use letitgo_repository::{
        BulkRequest, BulkResponse, SearchIndexClient, SearchIndexError, SearchIndexProvider,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{Mutex, Notify};
    use tower::ServiceExt;

    /// Mock provider that signals every bulk call.
    #[derive(Default)]
    struct MockProvider {
        bulk_calls: AtomicUsize,
        requests: Mutex<Vec<(String, Vec<String>)>>,
        written: Notify,
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
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            let items: Vec<Value> = request
                .ids()
                .iter()
                .map(|id| json!({"index": {"_id": id, "status": 201}}))
                .collect();
            self.requests
                .lock()
                .await
                .push((index.to_string(), request.ids().to_vec()));
            self.written.notify_one();
            serde_json::from_value(json!({"took": 1, "errors": false, "items": items}))
                .map_err(|e| SearchIndexError::parse(e.to_string()))
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn app(provider: Arc<MockProvider>) -> Router {
        let client = SearchIndexClient::new(provider);
        let ingestor = Ingestor::new(client, Decomposer::new(NodeIdPolicy::Random));
        router(ingestor, true)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(MockProvider::default()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["code"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_post_origin_schedules_indexing() {
        let provider = Arc::new(MockProvider::default());
        let app = app(provider.clone());

        let response = app
            .oneshot(post_json(
                "/origins",
                json!({
                    "sourceCode": "emr",
                    "sourceId": "ip-42",
                    "docs": {"vitals": [{"temp": 37.1}, {"temp": 36.9}]}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"code": 200, "success": true, "data": null})
        );

        tokio::time::timeout(Duration::from_secs(5), provider.written.notified())
            .await
            .unwrap();
        let requests = provider.requests.lock().await;
        assert_eq!(requests[0].0, "letitgo");
        assert_eq!(requests[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_post_doc_schedules_records() {
        let provider = Arc::new(MockProvider::default());
        let app = app(provider.clone());

        let response = app
            .oneshot(post_json(
                "/docs",
                json!({
                    "id": 1,
                    "name": "PCI",
                    "groups": [{"id": "1", "key": "patient", "name": "患者信息", "properties": [
                        {"id": "2", "key": "name", "name": "姓名", "etype": "text"}
                    ]}]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::timeout(Duration::from_secs(5), provider.written.notified())
            .await
            .unwrap();
        let requests = provider.requests.lock().await;
        assert_eq!(requests[0].0, "letitgo-property");
        assert_eq!(requests[0].1, vec!["property:2".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let provider = Arc::new(MockProvider::default());
        let app = app(provider.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/origins")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        tokio::task::yield_now().await;
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_router_with_logging_layer() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::default()));
        let ingestor = Ingestor::new(client, Decomposer::default());
        let app = router(ingestor, false);

        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
