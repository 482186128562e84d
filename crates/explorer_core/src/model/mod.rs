//! Explorer domain model.
//!
//! # Responsibility
//! - Define the node record shared by the repository, service and shell.
//! - Keep directory/file payloads in one tagged shape.
//!
//! # Invariants
//! - Every node is identified by a stable `NodeId`.
//! - Only the root node has no parent.

pub mod node;
pub mod snapshot;
