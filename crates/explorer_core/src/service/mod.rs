//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into tree store operations.
//! - Keep shell/presentation layers decoupled from arena details.

pub mod navigator;
pub mod tree_service;
