//! Tree repository contract and in-memory arena implementation.
//!
//! # Responsibility
//! - Own every node record and the parent/child edges between them.
//! - Keep structural bookkeeping (append, detach, subtree drop) inside the
//!   repository boundary.
//!
//! # Invariants
//! - The root node exists for the whole repository lifetime.
//! - Every non-root node is listed in exactly one parent's `children`.
//! - Child order is insertion order.
//! - Detaching a node drops its whole subtree from the arena.

use crate::model::node::{Node, NodeId, NodePayload};
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by tree repository operations.
pub type TreeRepoResult<T> = Result<T, TreeRepoError>;

/// Errors from tree repository operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRepoError {
    /// Target node is not present in the arena.
    NodeNotFound(NodeId),
    /// Target node exists but is a file.
    NotADirectory(NodeId),
    /// Operation would detach the root node.
    RootImmutable,
}

impl Display for TreeRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::NotADirectory(id) => write!(f, "node is not a directory: {id}"),
            Self::RootImmutable => write!(f, "root directory cannot be removed"),
        }
    }
}

impl Error for TreeRepoError {}

/// Storage contract for the explorer tree.
pub trait TreeRepository {
    /// Returns the root directory id.
    fn root_id(&self) -> NodeId;
    /// Loads one node by id.
    fn get_node(&self, node_id: NodeId) -> Option<&Node>;
    /// Appends a new child at the end of `parent_id`'s children.
    fn append_child(
        &mut self,
        parent_id: NodeId,
        name: &str,
        payload: NodePayload,
    ) -> TreeRepoResult<NodeId>;
    /// Detaches every immediate child of `parent_id` named `name`.
    ///
    /// Returns the detached child records in their former order.
    fn remove_children_named(&mut self, parent_id: NodeId, name: &str)
        -> TreeRepoResult<Vec<Node>>;
    /// Detaches one non-root node and its subtree.
    fn remove_node(&mut self, node_id: NodeId) -> TreeRepoResult<Node>;
    /// Number of live nodes, root included.
    fn node_count(&self) -> usize;
}

/// Arena-backed tree repository.
#[derive(Debug, Clone)]
pub struct InMemoryTreeRepository {
    nodes: HashMap<NodeId, Node>,
    root_id: NodeId,
}

impl InMemoryTreeRepository {
    /// Creates a repository holding only an empty root directory.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::root(root_name);
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self { nodes, root_id }
    }

    fn children_of(&self, parent_id: NodeId) -> TreeRepoResult<&[NodeId]> {
        self.nodes
            .get(&parent_id)
            .ok_or(TreeRepoError::NodeNotFound(parent_id))?
            .children()
            .ok_or(TreeRepoError::NotADirectory(parent_id))
    }

    fn children_of_mut(&mut self, parent_id: NodeId) -> TreeRepoResult<&mut Vec<NodeId>> {
        self.nodes
            .get_mut(&parent_id)
            .ok_or(TreeRepoError::NodeNotFound(parent_id))?
            .children_mut()
            .ok_or(TreeRepoError::NotADirectory(parent_id))
    }

    /// Removes `top_id` and all of its descendants from the arena.
    fn drop_subtree(&mut self, top_id: NodeId) -> Option<Node> {
        let top = self.nodes.remove(&top_id)?;
        let mut pending: Vec<NodeId> = top.children().map(<[_]>::to_vec).unwrap_or_default();
        while let Some(node_id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&node_id) {
                if let Some(children) = node.children() {
                    pending.extend_from_slice(children);
                }
            }
        }
        Some(top)
    }
}

impl Default for InMemoryTreeRepository {
    fn default() -> Self {
        Self::new("root")
    }
}

impl TreeRepository for InMemoryTreeRepository {
    fn root_id(&self) -> NodeId {
        self.root_id
    }

    fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    fn append_child(
        &mut self,
        parent_id: NodeId,
        name: &str,
        payload: NodePayload,
    ) -> TreeRepoResult<NodeId> {
        let node = Node::new(name, Some(parent_id), payload);
        let node_id = node.id;
        self.children_of_mut(parent_id)?.push(node_id);
        self.nodes.insert(node_id, node);
        Ok(node_id)
    }

    fn remove_children_named(
        &mut self,
        parent_id: NodeId,
        name: &str,
    ) -> TreeRepoResult<Vec<Node>> {
        let matching: Vec<NodeId> = self
            .children_of(parent_id)?
            .iter()
            .copied()
            .filter(|child_id| {
                self.nodes
                    .get(child_id)
                    .is_some_and(|child| child.name == name)
            })
            .collect();
        if matching.is_empty() {
            return Ok(Vec::new());
        }

        self.children_of_mut(parent_id)?
            .retain(|child_id| !matching.contains(child_id));

        let before = self.nodes.len();
        let removed: Vec<Node> = matching
            .into_iter()
            .filter_map(|child_id| self.drop_subtree(child_id))
            .collect();
        debug!(
            "event=subtree_drop module=repo status=ok detached={} dropped={}",
            removed.len(),
            before - self.nodes.len()
        );
        Ok(removed)
    }

    fn remove_node(&mut self, node_id: NodeId) -> TreeRepoResult<Node> {
        if node_id == self.root_id {
            return Err(TreeRepoError::RootImmutable);
        }
        let parent_id = self
            .nodes
            .get(&node_id)
            .ok_or(TreeRepoError::NodeNotFound(node_id))?
            .parent_id
            .ok_or(TreeRepoError::RootImmutable)?;

        self.children_of_mut(parent_id)?
            .retain(|child_id| *child_id != node_id);
        self.drop_subtree(node_id)
            .ok_or(TreeRepoError::NodeNotFound(node_id))
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
