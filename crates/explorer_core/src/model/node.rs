//! Node domain model.
//!
//! # Responsibility
//! - Define the canonical record for directories and files.
//! - Provide payload accessors so callers never match on raw variants.
//!
//! # Invariants
//! - `id` is stable and never reused for another node.
//! - `parent_id` is a relation only; the repository arena owns every node.
//! - A directory's `children` keep insertion order.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every node in the tree.
pub type NodeId = Uuid;

/// Discriminator for the two node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Container node holding ordered children.
    Directory,
    /// Leaf node holding text content.
    File,
}

impl NodeKind {
    /// Returns the stable lowercase label used in logs and dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

/// Variant-specific node data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePayload {
    /// Ordered child ids.
    Directory { children: Vec<NodeId> },
    /// Text payload.
    File { content: String },
}

/// Creation request for a new node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewNode {
    Directory,
    File { content: String },
}

impl NewNode {
    /// File request with the given content.
    pub fn file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory => NodeKind::Directory,
            Self::File { .. } => NodeKind::File,
        }
    }

    pub(crate) fn into_payload(self) -> NodePayload {
        match self {
            Self::Directory => NodePayload::Directory {
                children: Vec::new(),
            },
            Self::File { content } => NodePayload::File { content },
        }
    }
}

/// One directory or file in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable node id.
    pub id: NodeId,
    /// User-facing name, unique only among siblings when policy requires it.
    pub name: String,
    /// Parent id. `None` only for the root.
    pub parent_id: Option<NodeId>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Directory children or file content.
    pub payload: NodePayload,
}

impl Node {
    /// Creates a node with a generated id and the current timestamp.
    pub fn new(name: impl Into<String>, parent_id: Option<NodeId>, payload: NodePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            created_at: now_epoch_ms(),
            payload,
        }
    }

    /// Creates an empty parentless directory.
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(
            name,
            None,
            NodePayload::Directory {
                children: Vec::new(),
            },
        )
    }

    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::Directory { .. } => NodeKind::Directory,
            NodePayload::File { .. } => NodeKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Child ids for directories, `None` for files.
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.payload {
            NodePayload::Directory { children } => Some(children.as_slice()),
            NodePayload::File { .. } => None,
        }
    }

    /// File content, `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::File { content } => Some(content.as_str()),
            NodePayload::Directory { .. } => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.payload {
            NodePayload::Directory { children } => Some(children),
            NodePayload::File { .. } => None,
        }
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch collapse to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{NewNode, Node, NodeKind, NodePayload};

    #[test]
    fn new_file_request_maps_to_file_payload() {
        let payload = NewNode::file("hello").into_payload();
        assert_eq!(
            payload,
            NodePayload::File {
                content: "hello".to_string()
            }
        );
    }

    #[test]
    fn root_is_parentless_directory() {
        let root = Node::root("root");
        assert!(root.is_root());
        assert_eq!(root.kind(), NodeKind::Directory);
        assert_eq!(root.children(), Some(&[][..]));
        assert!(root.content().is_none());
        assert!(root.created_at > 0);
    }

    #[test]
    fn file_exposes_content_but_no_children() {
        let file = Node::new("notes", None, NewNode::file("body").into_payload());
        assert_eq!(file.content(), Some("body"));
        assert!(file.children().is_none());
        assert!(!file.is_directory());
    }
}
