//! Result types for search index operations.

use crate::errors::SearchIndexError;

/// What `ensure_index` had to do to make an index available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureIndexOutcome {
    /// The index was already present; nothing was changed.
    AlreadyExists,
    /// The index was missing and has been created with the supplied mapping.
    Created,
}

/// Result of a batch operation for a single unit.
///
/// This struct represents the outcome of indexing one unit within a bulk
/// request. It indicates whether the operation succeeded and includes error
/// details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Index document id of the unit.
    pub id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: true,
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, error: SearchIndexError) -> Self {
        Self {
            id: id.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// A summary with `failed > 0` means some units were stored and some were
/// not; callers decide whether that is acceptable.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of units in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each unit.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// True when every unit was stored.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Failed ids paired with their error.
    pub fn failures(&self) -> impl Iterator<Item = (&str, Option<&SearchIndexError>)> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| (r.id.as_str(), r.error.as_ref()))
    }
}
