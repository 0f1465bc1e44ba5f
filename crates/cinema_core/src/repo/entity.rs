//! Per-type table mapping descriptors and row mapping contracts.
//!
//! # Responsibility
//! - Describe where an entity lives (table, id column, sequence, columns).
//! - Convert entities into column maps and result rows back into entities.
//!
//! # Invariants
//! - `COLUMNS[0]` is the id column.
//! - Row mapping reports unresolvable references as `MapOutcome::Dangling`
//!   instead of deciding what to do with them.

use crate::query::compiler::ColumnValues;
use crate::query::specification::ColumnRef;
use crate::repo::repository::{RepoError, RepoResult};
use crate::storage::Row;
use std::fmt::{Display, Formatter};

/// Table mapping of one entity type.
pub trait TableEntity: Sized {
    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    const SEQUENCE: &'static str;
    const ID: ColumnRef;
    const COLUMNS: &'static [ColumnRef];

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: Option<i64>);
    /// Every mapped column including the id column.
    fn column_values(&self) -> RepoResult<ColumnValues>;
}

/// Entity stored with a foreign key to its owning parent.
pub trait ChildEntity: TableEntity {
    const PARENT: ColumnRef;
}

/// Entity mappable from a row without further lookups.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>>;
}

/// Converts one result row into an entity.
pub trait RowMapper<T> {
    fn map_row(&self, row: &Row) -> RepoResult<MapOutcome<T>>;
}

/// Row mapper for entities implementing [`FromRow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRows;

impl<T: FromRow> RowMapper<T> for DirectRows {
    fn map_row(&self, row: &Row) -> RepoResult<MapOutcome<T>> {
        T::from_row(row)
    }
}

/// Result of mapping one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome<T> {
    Mapped(T),
    Dangling(DanglingReference),
}

/// Reference from a stored row that points at nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub entity: &'static str,
    pub entity_id: i64,
    pub reference: ColumnRef,
    pub reference_id: i64,
}

impl Display for DanglingReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} references missing {} {}",
            self.entity, self.entity_id, self.reference, self.reference_id
        )
    }
}

/// Unwraps an identity that must already be assigned.
pub fn required_id(value: Option<i64>, column: ColumnRef) -> RepoResult<i64> {
    value.ok_or(RepoError::MissingId(column))
}
