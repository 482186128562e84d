//! Tree store use-case service.
//!
//! # Responsibility
//! - Validate names and directory capabilities above the repository layer.
//! - Provide create, find, list, remove, render and path operations.
//!
//! # Invariants
//! - Parent nodes must exist and be directories.
//! - Stored names are non-blank, free of `/`, control characters and
//!   surrounding whitespace, so lookups compare exactly what was stored.
//! - Name lookups return the first pre-order match.
//! - The root directory is never removed.

use crate::config::{ConfigError, DuplicateNamePolicy, ExplorerConfig};
use crate::model::node::{NewNode, Node, NodeId};
use crate::model::snapshot::{NodeSnapshot, SnapshotBody};
use crate::repo::tree_repo::{InMemoryTreeRepository, TreeRepoError, TreeRepository};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Path separator used by `path_of` and `resolve_path`.
pub const PATH_SEPARATOR: char = '/';

/// Deepest subtree `snapshot` will copy, counted in levels from its start.
pub const MAX_SNAPSHOT_DEPTH: usize = 256;

const INDENT: &str = "  ";

/// Reason a node name was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNameReason {
    /// Name is empty or whitespace only.
    Blank,
    /// Name starts or ends with whitespace.
    SurroundingWhitespace,
    /// Name contains a control character such as a newline.
    ControlCharacter,
    /// Name contains the path separator.
    ContainsSeparator,
    /// Name is `.` or `..`.
    Reserved,
    /// Name exceeds the configured character limit.
    TooLong { len: usize, max: usize },
}

impl Display for InvalidNameReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "name must not be blank"),
            Self::SurroundingWhitespace => {
                write!(f, "name must not start or end with whitespace")
            }
            Self::ControlCharacter => write!(f, "name must not contain control characters"),
            Self::ContainsSeparator => write!(f, "name must not contain `{PATH_SEPARATOR}`"),
            Self::Reserved => write!(f, "`.` and `..` are reserved names"),
            Self::TooLong { len, max } => {
                write!(f, "name has {len} characters; limit is {max}")
            }
        }
    }
}

/// Errors from tree service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeServiceError {
    /// Target node id does not exist.
    NodeNotFound(NodeId),
    /// No node with this name was found where one was required.
    NameNotFound(String),
    /// Node exists but lacks the capability the operation needs.
    InvalidOperation {
        node_id: NodeId,
        reason: &'static str,
    },
    /// Proposed node name is unusable.
    InvalidName(InvalidNameReason),
    /// Sibling with this name exists and duplicates are rejected.
    DuplicateName { parent_id: NodeId, name: String },
    /// Operation targets the root directory.
    RootImmutable,
    /// Subtree is deeper than `MAX_SNAPSHOT_DEPTH`.
    DepthLimitExceeded { node_id: NodeId, max_depth: usize },
}

impl Display for TreeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::NameNotFound(name) => write!(f, "no such file or directory: {name}"),
            Self::InvalidOperation { node_id, reason } => {
                write!(f, "invalid operation on {node_id}: {reason}")
            }
            Self::InvalidName(reason) => write!(f, "invalid name: {reason}"),
            Self::DuplicateName { name, .. } => write!(f, "name already exists: {name}"),
            Self::RootImmutable => write!(f, "root directory cannot be removed"),
            Self::DepthLimitExceeded { node_id, max_depth } => write!(
                f,
                "subtree at {node_id} is deeper than {max_depth} levels"
            ),
        }
    }
}

impl Error for TreeServiceError {}

impl From<TreeRepoError> for TreeServiceError {
    fn from(value: TreeRepoError) -> Self {
        match value {
            TreeRepoError::NodeNotFound(node_id) => Self::NodeNotFound(node_id),
            TreeRepoError::NotADirectory(node_id) => Self::InvalidOperation {
                node_id,
                reason: "not a directory",
            },
            TreeRepoError::RootImmutable => Self::RootImmutable,
        }
    }
}

/// Result type used by tree service operations.
pub type TreeResult<T> = Result<T, TreeServiceError>;

/// Tree store facade.
pub struct TreeService<R: TreeRepository> {
    repo: R,
    config: ExplorerConfig,
}

impl TreeService<InMemoryTreeRepository> {
    /// Creates an in-memory store from validated configuration.
    pub fn in_memory(config: ExplorerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let repo = InMemoryTreeRepository::new(config.root_name.trim());
        Ok(Self { repo, config })
    }
}

impl Default for TreeService<InMemoryTreeRepository> {
    fn default() -> Self {
        Self::new(InMemoryTreeRepository::default())
    }
}

impl<R: TreeRepository> TreeService<R> {
    /// Creates service from repository implementation with default config.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            config: ExplorerConfig::default(),
        }
    }

    /// Creates service with explicit configuration.
    ///
    /// # Errors
    /// - Any `ExplorerConfig::validate` failure.
    /// - `RootNameMismatch` when the repository root is not named
    ///   `config.root_name`.
    pub fn with_config(repo: R, config: ExplorerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let configured = config.root_name.trim();
        let actual = repo
            .get_node(repo.root_id())
            .map(|root| root.name.as_str())
            .unwrap_or_default();
        if actual != configured {
            return Err(ConfigError::RootNameMismatch {
                configured: configured.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(Self { repo, config })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn root_id(&self) -> NodeId {
        self.repo.root_id()
    }

    /// Returns the root directory.
    pub fn root(&self) -> TreeResult<&Node> {
        self.get_node(self.root_id())
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.repo.node_count()
    }

    /// Loads one node by id.
    pub fn get_node(&self, node_id: NodeId) -> TreeResult<&Node> {
        self.repo
            .get_node(node_id)
            .ok_or(TreeServiceError::NodeNotFound(node_id))
    }

    /// Creates one node at the end of `parent_id`'s children.
    ///
    /// # Errors
    /// - `InvalidName` when `name` fails validation.
    /// - `NodeNotFound` / `InvalidOperation` when the parent is missing or a file.
    /// - `DuplicateName` under `DuplicateNamePolicy::Reject`.
    pub fn create_node(
        &mut self,
        parent_id: NodeId,
        name: &str,
        new_node: NewNode,
    ) -> TreeResult<&Node> {
        let name = self.normalize_name(name)?;
        self.directory(parent_id)?;
        if self.config.duplicate_names == DuplicateNamePolicy::Reject
            && self.child_by_name(parent_id, &name)?.is_some()
        {
            return Err(TreeServiceError::DuplicateName { parent_id, name });
        }

        let kind = new_node.kind();
        let node_id = self
            .repo
            .append_child(parent_id, &name, new_node.into_payload())?;
        debug!(
            "event=node_create module=tree status=ok kind={} node_id={} parent_id={}",
            kind.as_str(),
            node_id,
            parent_id
        );
        self.get_node(node_id)
    }

    /// Creates one empty directory under `parent_id`.
    pub fn create_directory(&mut self, parent_id: NodeId, name: &str) -> TreeResult<&Node> {
        self.create_node(parent_id, name, NewNode::Directory)
    }

    /// Creates one file with `content` under `parent_id`.
    pub fn create_file(
        &mut self,
        parent_id: NodeId,
        name: &str,
        content: impl Into<String>,
    ) -> TreeResult<&Node> {
        self.create_node(parent_id, name, NewNode::file(content))
    }

    /// Searches the subtree at `start_id` in pre-order for `name`.
    ///
    /// Returns `Ok(None)` when nothing matches. With duplicate names the
    /// first node visited wins.
    pub fn find_by_name(&self, start_id: NodeId, name: &str) -> TreeResult<Option<&Node>> {
        let mut pending = vec![self.get_node(start_id)?];
        while let Some(node) = pending.pop() {
            if node.name == name {
                return Ok(Some(node));
            }
            if let Some(children) = node.children() {
                for child_id in children.iter().rev() {
                    pending.push(self.get_node(*child_id)?);
                }
            }
        }
        Ok(None)
    }

    /// Like `find_by_name`, but absence is an error.
    pub fn require_by_name(&self, start_id: NodeId, name: &str) -> TreeResult<&Node> {
        self.find_by_name(start_id, name)?
            .ok_or_else(|| TreeServiceError::NameNotFound(name.to_string()))
    }

    /// First immediate child of `directory_id` named `name`.
    pub fn child_by_name(&self, directory_id: NodeId, name: &str) -> TreeResult<Option<&Node>> {
        for child in self.list_children(directory_id)? {
            if child.name == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// Children of one directory in stored order.
    pub fn list_children(&self, directory_id: NodeId) -> TreeResult<Vec<&Node>> {
        let directory = self.directory(directory_id)?;
        directory
            .children()
            .unwrap_or_default()
            .iter()
            .map(|child_id| self.get_node(*child_id))
            .collect()
    }

    /// Removes every immediate child of `parent_id` named `name`.
    ///
    /// Returns how many children were detached. Subtrees go with them.
    pub fn remove(&mut self, parent_id: NodeId, name: &str) -> TreeResult<usize> {
        self.directory(parent_id)?;
        let before = self.repo.node_count();
        let removed = self.repo.remove_children_named(parent_id, name)?;
        debug!(
            "event=node_remove module=tree status=ok parent_id={} detached={} dropped={}",
            parent_id,
            removed.len(),
            before - self.repo.node_count()
        );
        Ok(removed.len())
    }

    /// Removes one node by identity, along with its subtree.
    pub fn remove_node(&mut self, node_id: NodeId) -> TreeResult<Node> {
        if node_id == self.root_id() {
            return Err(TreeServiceError::RootImmutable);
        }
        let removed = self.repo.remove_node(node_id)?;
        debug!(
            "event=node_remove module=tree status=ok node_id={} kind={}",
            node_id,
            removed.kind().as_str()
        );
        Ok(removed)
    }

    /// Content of one file.
    pub fn read_file(&self, node_id: NodeId) -> TreeResult<&str> {
        self.get_node(node_id)?
            .content()
            .ok_or(TreeServiceError::InvalidOperation {
                node_id,
                reason: "not a file",
            })
    }

    /// Ids from the root down to `node_id`, both included.
    pub fn ancestors(&self, node_id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.get_node(current)?.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Absolute `/`-separated path of one node; the root is `/`.
    pub fn path_of(&self, node_id: NodeId) -> TreeResult<String> {
        let mut path = String::new();
        for ancestor_id in self.ancestors(node_id)?.into_iter().skip(1) {
            path.push(PATH_SEPARATOR);
            path.push_str(&self.get_node(ancestor_id)?.name);
        }
        if path.is_empty() {
            path.push(PATH_SEPARATOR);
        }
        Ok(path)
    }

    /// Resolves a `/`-separated path, absolute or relative to `from_id`.
    ///
    /// `.` stays put and `..` climbs one level (the root is its own parent).
    /// Each named segment takes the first matching child.
    pub fn resolve_path(&self, from_id: NodeId, path: &str) -> TreeResult<&Node> {
        let mut current = if path.starts_with(PATH_SEPARATOR) {
            self.root_id()
        } else {
            self.get_node(from_id)?.id
        };

        for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            current = match segment {
                "." => current,
                ".." => self.get_node(current)?.parent_id.unwrap_or(current),
                name => {
                    self.child_by_name(current, name)?
                        .ok_or_else(|| TreeServiceError::NameNotFound(name.to_string()))?
                        .id
                }
            };
        }
        self.get_node(current)
    }

    /// Renders the subtree at `node_id`, one line per node.
    ///
    /// Directories end with `/`; files render as `name: content` with
    /// control characters escaped. Each level indents by two spaces.
    pub fn render_tree(&self, node_id: NodeId) -> TreeResult<String> {
        let mut out = String::new();
        let mut pending = vec![(self.get_node(node_id)?, 0usize)];
        while let Some((node, depth)) = pending.pop() {
            out.push_str(&INDENT.repeat(depth));
            out.push_str(&node.name);
            match node.children() {
                Some(children) => {
                    out.push(PATH_SEPARATOR);
                    for child_id in children.iter().rev() {
                        pending.push((self.get_node(*child_id)?, depth + 1));
                    }
                }
                None => {
                    out.push(':');
                    let content = node.content().unwrap_or_default();
                    if !content.is_empty() {
                        out.push(' ');
                        push_escaped(&mut out, content);
                    }
                }
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Writes `render_tree` output to stdout.
    pub fn print_tree(&self, node_id: NodeId) -> TreeResult<()> {
        print!("{}", self.render_tree(node_id)?);
        Ok(())
    }

    /// Nested serializable copy of the subtree at `node_id`.
    ///
    /// # Errors
    /// - `DepthLimitExceeded` when the subtree has more than
    ///   `MAX_SNAPSHOT_DEPTH` levels.
    pub fn snapshot(&self, node_id: NodeId) -> TreeResult<NodeSnapshot> {
        let mut frames = vec![SnapshotFrame::new(self.get_node(node_id)?)];
        while let Some(frame) = frames.last_mut() {
            let next_child = frame
                .node
                .children()
                .and_then(|children| children.get(frame.next_child))
                .copied();
            if let Some(child_id) = next_child {
                frame.next_child += 1;
                if frames.len() >= MAX_SNAPSHOT_DEPTH {
                    return Err(TreeServiceError::DepthLimitExceeded {
                        node_id,
                        max_depth: MAX_SNAPSHOT_DEPTH,
                    });
                }
                frames.push(SnapshotFrame::new(self.get_node(child_id)?));
                continue;
            }

            let Some(done) = frames.pop() else { break };
            let snapshot = done.finish();
            match frames.last_mut() {
                Some(parent) => parent.children.push(snapshot),
                None => return Ok(snapshot),
            }
        }
        // The loop returns when the start frame finishes.
        Err(TreeServiceError::NodeNotFound(node_id))
    }

    fn directory(&self, node_id: NodeId) -> TreeResult<&Node> {
        let node = self.get_node(node_id)?;
        if !node.is_directory() {
            return Err(TreeServiceError::InvalidOperation {
                node_id,
                reason: "not a directory",
            });
        }
        Ok(node)
    }

    /// Validates a name exactly as it will be stored and looked up.
    fn normalize_name(&self, value: &str) -> TreeResult<String> {
        let reason = if value.trim().is_empty() {
            Some(InvalidNameReason::Blank)
        } else if value.trim() != value {
            Some(InvalidNameReason::SurroundingWhitespace)
        } else if value.chars().any(char::is_control) {
            Some(InvalidNameReason::ControlCharacter)
        } else if value.contains(PATH_SEPARATOR) {
            Some(InvalidNameReason::ContainsSeparator)
        } else if value == "." || value == ".." {
            Some(InvalidNameReason::Reserved)
        } else {
            let len = value.chars().count();
            (len > self.config.max_name_len).then_some(InvalidNameReason::TooLong {
                len,
                max: self.config.max_name_len,
            })
        };
        match reason {
            Some(reason) => Err(TreeServiceError::InvalidName(reason)),
            None => Ok(value.to_string()),
        }
    }
}

/// One directory being assembled by `TreeService::snapshot`.
struct SnapshotFrame<'a> {
    node: &'a Node,
    next_child: usize,
    children: Vec<NodeSnapshot>,
}

impl<'a> SnapshotFrame<'a> {
    fn new(node: &'a Node) -> Self {
        Self {
            node,
            next_child: 0,
            children: Vec::new(),
        }
    }

    fn finish(self) -> NodeSnapshot {
        let body = match self.node.content() {
            Some(content) => SnapshotBody::File {
                content: content.to_string(),
            },
            None => SnapshotBody::Directory {
                children: self.children,
            },
        };
        NodeSnapshot {
            id: self.node.id,
            name: self.node.name.clone(),
            created_at: self.node.created_at,
            body,
        }
    }
}

/// Appends `content` with backslashes and control characters escaped.
fn push_escaped(out: &mut String, content: &str) {
    for ch in content.chars() {
        if ch == '\\' || ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
}
