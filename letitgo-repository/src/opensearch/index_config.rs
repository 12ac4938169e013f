//! OpenSearch index configuration and mappings.
//!
//! Two indices are provisioned independently: one for flattened nodes and one
//! for the doc/group/property model. Mappings are fixed and versionless.

use serde_json::{json, Value};

/// Name of the index holding flattened nodes.
pub const NODE_INDEX_NAME: &str = "letitgo";

/// Name of the index holding property records.
pub const PROPERTY_INDEX_NAME: &str = "letitgo-property";

/// An index name together with the body used to create it.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index name.
    pub name: String,
    /// Settings and mappings sent on creation.
    pub body: Value,
}

impl IndexConfig {
    pub fn new(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// The node index.
    ///
    /// `gid`, `id` and `groupk` are keywords for exact lookups and grouping,
    /// `clen` is a long. `kvs` and `cids` are left to dynamic mapping since
    /// source field sets differ per record.
    pub fn nodes() -> Self {
        Self::new(
            NODE_INDEX_NAME,
            json!({
                "mappings": {
                    "properties": {
                        "clen": { "type": "long" },
                        "gid": { "type": "keyword" },
                        "groupk": { "type": "keyword" },
                        "id": { "type": "keyword" }
                    }
                }
            }),
        )
    }

    /// The property index, with one object per record kind plus the `type` discriminator.
    pub fn properties() -> Self {
        Self::new(
            PROPERTY_INDEX_NAME,
            json!({
                "mappings": {
                    "properties": {
                        "type": { "type": "keyword" },
                        "property": {
                            "properties": {
                                "id": { "type": "keyword" },
                                "key": { "type": "keyword" },
                                "name": { "type": "keyword" },
                                "etype": { "type": "keyword" }
                            }
                        },
                        "group": {
                            "properties": {
                                "id": { "type": "keyword" },
                                "key": { "type": "keyword" },
                                "name": { "type": "keyword" }
                            }
                        },
                        "doc": {
                            "properties": {
                                "id": { "type": "keyword" },
                                "code": { "type": "keyword" },
                                "name": { "type": "keyword" }
                            }
                        }
                    }
                }
            }),
        )
    }
}
