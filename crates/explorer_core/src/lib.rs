//! Core tree store for the explorer.
//! This crate owns every structural invariant of the directory/file tree.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DuplicateNamePolicy, ExplorerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::node::{NewNode, Node, NodeId, NodeKind, NodePayload};
pub use model::snapshot::{NodeSnapshot, SnapshotBody};
pub use repo::tree_repo::{InMemoryTreeRepository, TreeRepoError, TreeRepoResult, TreeRepository};
pub use service::navigator::Navigator;
pub use service::tree_service::{
    InvalidNameReason, TreeResult, TreeService, TreeServiceError, MAX_SNAPSHOT_DEPTH,
    PATH_SEPARATOR,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
