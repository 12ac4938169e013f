//! Bulk API wire format.
//!
//! A bulk request is newline-delimited JSON: for every unit an action line
//! `{"index":{"_id":"<id>"}}` followed by the unit's body on its own line,
//! with a trailing newline after the last line. The response carries one item
//! per unit, in request order, each with its own status and optional error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationResult;

/// An in-memory bulk request of index actions.
#[derive(Debug, Clone, Default)]
pub struct BulkRequest {
    ids: Vec<String>,
    lines: Vec<String>,
}

impl BulkRequest {
    /// Create an empty bulk request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an upsert-by-id action for `body`.
    ///
    /// The body is encoded before anything is appended, so a unit that fails
    /// to serialize leaves the request untouched.
    pub fn push_index<T: Serialize + ?Sized>(
        &mut self,
        id: &str,
        body: &T,
    ) -> Result<(), serde_json::Error> {
        let data = serde_json::to_string(body)?;
        let action = json!({ "index": { "_id": id } }).to_string();

        self.ids.push(id.to_string());
        self.lines.push(action);
        self.lines.push(data);
        Ok(())
    }

    /// Number of units in the request.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Document ids in request order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Action and data lines, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The full newline-delimited payload, as sent on the wire.
    pub fn to_ndjson(&self) -> String {
        let mut payload = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            payload.push_str(line);
            payload.push('\n');
        }
        payload
    }
}

/// Error detail for a rejected bulk item.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of a single action inside a bulk response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemStatus {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

impl BulkItemStatus {
    fn describe_error(&self) -> Option<String> {
        self.error.as_ref().map(|e| match &e.reason {
            Some(reason) => format!("{} (status {}): {}", e.kind, self.status, reason),
            None => format!("{} (status {})", e.kind, self.status),
        })
    }
}

/// Parsed body of a bulk response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub errors: bool,
    /// One entry per action, keyed by the action name (`index`).
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItemStatus>>,
}

impl BulkResponse {
    /// Match response items to the ids that were sent and build one result per id.
    ///
    /// Items are matched by position. An id without a corresponding item is
    /// reported as failed, since the engine gave no evidence it was stored.
    pub fn into_results(self, sent_ids: &[String]) -> Vec<BatchOperationResult> {
        let mut items = self.items.into_iter();

        sent_ids
            .iter()
            .map(|sent_id| {
                let status = items.next().and_then(|item| item.into_values().next());
                match status {
                    Some(status) => match status.describe_error() {
                        Some(reason) => BatchOperationResult::failure(
                            status.id.unwrap_or_else(|| sent_id.clone()),
                            SearchIndexError::bulk_operation(reason),
                        ),
                        None => {
                            BatchOperationResult::success(status.id.unwrap_or_else(|| sent_id.clone()))
                        }
                    },
                    None => BatchOperationResult::failure(
                        sent_id.clone(),
                        SearchIndexError::parse("missing item in bulk response"),
                    ),
                }
            })
            .collect()
    }
}
