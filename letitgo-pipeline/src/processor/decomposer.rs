//! Origin decomposition.
//!
//! Every entry of every group in an origin becomes one node. All nodes of one
//! origin share a group id, which is how they are put back together at query
//! time.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use letitgo_shared::{Node, Origin};

/// Namespace for name-based node ids.
const NODE_NAMESPACE: Uuid = Uuid::from_u128(0x6c65_7469_7467_4f00_8000_6e6f_6465_7321);

/// How group ids and node ids are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeIdPolicy {
    /// Fresh random ids on every run. Re-indexing an origin adds new documents.
    #[default]
    Random,
    /// Ids derived from the origin's source code and source id, the group key
    /// and the entry position. Re-indexing an unchanged origin overwrites the
    /// same documents.
    Deterministic,
}

impl FromStr for NodeIdPolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "deterministic" => Ok(Self::Deterministic),
            other => Err(PipelineError::validation(format!(
                "unknown node id policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for NodeIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Deterministic => f.write_str("deterministic"),
        }
    }
}

/// Decomposes origins into nodes.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decomposer {
    policy: NodeIdPolicy,
}

impl Decomposer {
    /// Create a decomposer using the given id policy.
    pub fn new(policy: NodeIdPolicy) -> Self {
        Self { policy }
    }

    /// Flatten an origin into one node per group entry.
    ///
    /// Each node copies its entry verbatim into `kvs`. An origin without
    /// groups, or with only empty groups, yields no nodes. Callers must not
    /// rely on the order of the result.
    ///
    /// # Errors
    ///
    /// With the deterministic policy an origin must carry a source id,
    /// otherwise unrelated origins would share a group id.
    #[instrument(skip(self, origin), fields(source_id = %origin.source_id, policy = %self.policy))]
    pub fn parse_nodes(&self, origin: &Origin) -> Result<Vec<Node>, PipelineError> {
        let gid = self.group_id(origin)?;
        let gid_str = gid.to_string();

        let mut nodes = Vec::with_capacity(origin.entry_count());
        for (key, entries) in &origin.docs {
            for (position, entry) in entries.iter().enumerate() {
                let id = self.node_id(&gid, key, position);
                nodes.push(Node::new(gid_str.clone(), id.to_string(), key.clone(), entry.clone()));
            }
        }

        debug!(gid = %gid_str, node_count = nodes.len(), "Decomposed origin");
        Ok(nodes)
    }

    fn group_id(&self, origin: &Origin) -> Result<Uuid, PipelineError> {
        match self.policy {
            NodeIdPolicy::Random => Ok(Uuid::new_v4()),
            NodeIdPolicy::Deterministic => {
                if origin.source_id.trim().is_empty() {
                    return Err(PipelineError::validation(
                        "origin needs a sourceId for deterministic node ids",
                    ));
                }
                let name = format!("{}\u{0}{}", origin.source_code, origin.source_id);
                Ok(Uuid::new_v5(&NODE_NAMESPACE, name.as_bytes()))
            }
        }
    }

    fn node_id(&self, gid: &Uuid, key: &str, position: usize) -> Uuid {
        match self.policy {
            NodeIdPolicy::Random => Uuid::new_v4(),
            NodeIdPolicy::Deterministic => {
                let name = format!("{}\u{0}{}", key, position);
                Uuid::new_v5(gid, name.as_bytes())
            }
        }
    }
}
