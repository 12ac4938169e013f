//! Source module for the letitgo pipeline.
//!
//! Reads origins and docs handed over by upstream producers as JSON. A file
//! may hold one origin object or an array of them.

use std::path::Path;

use tracing::debug;

use crate::errors::PipelineError;
use letitgo_shared::{Doc, Origin};

/// Decode one origin or an array of origins.
///
/// The first non-whitespace byte picks the shape, so decode errors keep
/// their line and column.
pub fn parse_origins(bytes: &[u8]) -> Result<Vec<Origin>, PipelineError> {
    let invalid = |e: serde_json::Error| PipelineError::input(format!("invalid origin JSON: {}", e));

    match bytes.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => serde_json::from_slice(bytes).map_err(invalid),
        _ => serde_json::from_slice::<Origin>(bytes)
            .map(|origin| vec![origin])
            .map_err(invalid),
    }
}

/// Decode a doc.
pub fn parse_doc(bytes: &[u8]) -> Result<Doc, PipelineError> {
    serde_json::from_slice(bytes).map_err(|e| PipelineError::input(format!("invalid doc JSON: {}", e)))
}

/// Read origins from a JSON file.
pub async fn read_origins(path: impl AsRef<Path>) -> Result<Vec<Origin>, PipelineError> {
    let bytes = read(path.as_ref()).await?;
    let origins = parse_origins(&bytes)?;
    debug!(path = %path.as_ref().display(), count = origins.len(), "Read origins");
    Ok(origins)
}

/// Read a doc from a JSON file.
pub async fn read_doc(path: impl AsRef<Path>) -> Result<Doc, PipelineError> {
    let bytes = read(path.as_ref()).await?;
    parse_doc(&bytes)
}

async fn read(path: &Path) -> Result<Vec<u8>, PipelineError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::input(format!("cannot read {}: {}", path.display(), e)))
}
