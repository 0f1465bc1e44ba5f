//! Backend-agnostic query specifications and their SQL compilation.
//!
//! # Responsibility
//! - Describe row filters as immutable predicate trees.
//! - Centralize every query shape the domain needs in one factory.
//! - Compile predicate trees and column maps into bound SQL statements.
//!
//! # Invariants
//! - `SpecificationFactory` is the only public producer of specifications.
//! - Composite specifications always carry an explicit AND/OR operator.

pub mod compiler;
pub mod factory;
pub mod specification;
