//! Serializable subtree copies.
//!
//! Snapshots nest children inline, unlike `Node`, which refers to children
//! by id. They are produced by `TreeService::snapshot` for dumps and tests.

use crate::model::node::NodeId;
use serde::{Deserialize, Serialize};

/// Nested copy of one node and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub body: SnapshotBody,
}

/// Variant-specific snapshot data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotBody {
    Directory { children: Vec<NodeSnapshot> },
    File { content: String },
}

impl NodeSnapshot {
    /// Child snapshots, empty for files.
    pub fn children(&self) -> &[NodeSnapshot] {
        match &self.body {
            SnapshotBody::Directory { children } => children,
            SnapshotBody::File { .. } => &[],
        }
    }
}
