//! Raw grouped record received from an upstream producer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Kvs;

/// A raw medical-record document, grouped by key and not yet flattened.
///
/// `docs` maps a group key to its ordered entries. A key may map to an empty
/// list; entries themselves are always objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// Disease or category id.
    #[serde(default)]
    pub disease_id: i64,
    /// Hospital id.
    #[serde(default)]
    pub hospital_id: i64,
    /// Department id.
    #[serde(default)]
    pub dept_id: i64,
    /// Code of the source system.
    #[serde(default)]
    pub source_code: String,
    /// Record id inside the source system.
    #[serde(default)]
    pub source_id: String,
    /// Group key to entries.
    #[serde(default)]
    pub docs: BTreeMap<String, Vec<Kvs>>,
}

impl Origin {
    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.docs.values().map(Vec::len).sum()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}
