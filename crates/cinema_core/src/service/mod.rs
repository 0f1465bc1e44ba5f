//! Compound use-case operations.
//!
//! # Responsibility
//! - Orchestrate repository calls into graph-level operations.
//! - Keep upper layers decoupled from per-entity repositories.

pub mod data_manager;
