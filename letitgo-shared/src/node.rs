//! Flattened node produced from an [`Origin`](crate::Origin).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::BulkDocument;

/// Field-value mapping carried by a node, copied verbatim from the source entry.
pub type Kvs = Map<String, Value>;

/// One independently indexable unit derived from a single group entry.
///
/// All nodes decomposed from the same origin share a `gid`. The `cids` and
/// `clen` fields are reserved for child linkage and are left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Group identifier shared by every node of one origin.
    pub gid: String,
    /// Unique id of this node, used as the index document id.
    pub id: String,
    /// Child node ids.
    #[serde(default)]
    pub cids: Vec<String>,
    /// Number of children.
    #[serde(default)]
    pub clen: i32,
    /// Group key this node was derived from.
    pub groupk: String,
    /// Source entry.
    pub kvs: Kvs,
}

impl Node {
    /// Create a leaf node with no children.
    pub fn new(
        gid: impl Into<String>,
        id: impl Into<String>,
        groupk: impl Into<String>,
        kvs: Kvs,
    ) -> Self {
        Self {
            gid: gid.into(),
            id: id.into(),
            cids: Vec::new(),
            clen: 0,
            groupk: groupk.into(),
            kvs,
        }
    }
}

impl BulkDocument for Node {
    fn document_id(&self) -> String {
        self.id.clone()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}
