//! HTTP handlers.
//!
//! Ingest handlers only schedule work: the pipeline runs on its own task and
//! its outcome is logged, never returned to the caller.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::server::AppState;
use letitgo_shared::{Doc, Origin};

/// Envelope of every JSON response.
#[derive(Debug, Serialize)]
pub struct ServerResult<T> {
    pub code: u16,
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ServerResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            success: true,
            data: Some(data),
        }
    }
}

impl ServerResult<()> {
    /// Success without payload; `data` serializes as `null`.
    pub fn accepted() -> Self {
        Self {
            code: 200,
            success: true,
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub version: &'static str,
}

pub async fn health_handler() -> Json<ServerResult<HealthData>> {
    Json(ServerResult::ok(HealthData {
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Decompose and index one origin in the background.
pub async fn origin_handler(
    State(state): State<AppState>,
    Json(origin): Json<Origin>,
) -> Json<ServerResult<()>> {
    info!(source_id = %origin.source_id, entries = origin.entry_count(), "Scheduling origin");

    let ingestor = state.ingestor.clone();
    tokio::spawn(async move {
        match ingestor.ingest_origin(&origin).await {
            Ok(report) if report.summary.is_complete() => {
                info!(gid = ?report.gid, indexed = report.summary.succeeded, "Origin indexed");
            }
            Ok(report) => {
                warn!(
                    gid = ?report.gid,
                    succeeded = report.summary.succeeded,
                    failed = report.summary.failed,
                    "Origin partially indexed"
                );
            }
            Err(e) => error!(error = %e, source_id = %origin.source_id, "Failed to index origin"),
        }
    });

    Json(ServerResult::accepted())
}

/// Index the property records of one doc in the background.
pub async fn doc_handler(
    State(state): State<AppState>,
    Json(doc): Json<Doc>,
) -> Json<ServerResult<()>> {
    info!(doc_id = doc.id, groups = doc.groups.len(), "Scheduling doc");

    let ingestor = state.ingestor.clone();
    tokio::spawn(async move {
        match ingestor.ingest_doc(&doc).await {
            Ok(summary) if summary.is_complete() => {
                info!(doc_id = doc.id, indexed = summary.succeeded, "Doc records indexed");
            }
            Ok(summary) => {
                warn!(
                    doc_id = doc.id,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    "Doc records partially indexed"
                );
            }
            Err(e) => error!(error = %e, doc_id = doc.id, "Failed to index doc records"),
        }
    });

    Json(ServerResult::accepted())
}
