//! Repository layer abstractions and the in-memory implementation.
//!
//! # Responsibility
//! - Define the storage contract the tree service is written against.
//! - Keep arena bookkeeping out of service/business orchestration.
//!
//! # Invariants
//! - Repositories never validate names; that belongs to the service layer.
//! - Repository APIs report structural failures as `TreeRepoError`.

pub mod tree_repo;
