//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the uniform CRUD contract shared by every entity type.
//! - Own the table-to-entity mapping of each entity.
//! - Isolate statement compilation/execution from the data manager.
//!
//! # Invariants
//! - Identity is assigned from the entity's sequence on `add`, never earlier.
//! - `query` with no matches returns an empty vector; single-row access goes
//!   through `query_one`, which reports `NotFound`.
//! - Unresolvable references during read mapping follow `IntegrityPolicy`.

pub mod entity;
pub mod existence;
pub mod film_repo;
pub mod mappings;
pub mod repository;
pub mod sql_repository;
