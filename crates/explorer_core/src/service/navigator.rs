//! Caller-owned navigation cursor.
//!
//! The tree itself has no notion of a "current directory". Shells keep a
//! `Navigator` next to the `TreeService` and pass the service in on every
//! move, so the cursor never borrows the tree across mutations.

use crate::model::node::{Node, NodeId};
use crate::repo::tree_repo::TreeRepository;
use crate::service::tree_service::{TreeResult, TreeService, TreeServiceError};
use log::debug;

/// Stack of directory ids from the root down to the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    root_id: NodeId,
    // Excludes the root; empty means the cursor sits at the root.
    trail: Vec<NodeId>,
}

impl Navigator {
    /// Starts at the root of `service`.
    pub fn new<R: TreeRepository>(service: &TreeService<R>) -> Self {
        Self {
            root_id: service.root_id(),
            trail: Vec::new(),
        }
    }

    pub fn current(&self) -> NodeId {
        self.trail.last().copied().unwrap_or(self.root_id)
    }

    /// Levels below the root.
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.trail.is_empty()
    }

    /// Absolute path of the current directory.
    pub fn path<R: TreeRepository>(&self, service: &TreeService<R>) -> TreeResult<String> {
        service.path_of(self.current())
    }

    /// Enters the first immediate child directory named `name`.
    ///
    /// # Errors
    /// - `NameNotFound` when no child has that name.
    /// - `InvalidOperation` when the first match is a file.
    pub fn enter<'s, R: TreeRepository>(
        &mut self,
        service: &'s TreeService<R>,
        name: &str,
    ) -> TreeResult<&'s Node> {
        let child = service
            .child_by_name(self.current(), name)?
            .ok_or_else(|| TreeServiceError::NameNotFound(name.to_string()))?;
        if !child.is_directory() {
            return Err(TreeServiceError::InvalidOperation {
                node_id: child.id,
                reason: "not a directory",
            });
        }
        self.trail.push(child.id);
        debug!(
            "event=nav_enter module=navigator status=ok depth={}",
            self.depth()
        );
        Ok(child)
    }

    /// Moves up one level. Returns `false` when already at the root.
    pub fn back(&mut self) -> bool {
        self.trail.pop().is_some()
    }

    /// Returns to the root.
    pub fn reset(&mut self) {
        self.trail.clear();
    }

    /// Moves to the directory at `path`, absolute or relative to the cursor.
    ///
    /// The cursor is left untouched when resolution fails.
    pub fn change_dir<'s, R: TreeRepository>(
        &mut self,
        service: &'s TreeService<R>,
        path: &str,
    ) -> TreeResult<&'s Node> {
        let target = service.resolve_path(self.current(), path)?;
        if !target.is_directory() {
            return Err(TreeServiceError::InvalidOperation {
                node_id: target.id,
                reason: "not a directory",
            });
        }
        self.trail = service.ancestors(target.id)?.into_iter().skip(1).collect();
        debug!(
            "event=nav_change_dir module=navigator status=ok depth={}",
            self.depth()
        );
        Ok(target)
    }

    /// Drops trail entries whose directories no longer exist.
    ///
    /// Returns `true` when the cursor moved.
    pub fn revalidate<R: TreeRepository>(&mut self, service: &TreeService<R>) -> bool {
        let live = self
            .trail
            .iter()
            .take_while(|node_id| service.get_node(**node_id).is_ok())
            .count();
        if live == self.trail.len() {
            return false;
        }
        self.trail.truncate(live);
        debug!(
            "event=nav_revalidate module=navigator status=moved depth={}",
            self.depth()
        );
        true
    }
}
