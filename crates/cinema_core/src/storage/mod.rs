//! Storage transport boundary consumed by repositories.
//!
//! # Responsibility
//! - Define how compiled statements are executed and rows come back.
//! - Define the identity source used once per entity creation.
//!
//! # Invariants
//! - Every backend rejection surfaces as `StorageError`; nothing is retried.
//! - Calls are synchronous and run on the caller's thread.

use crate::db::DbError;
use crate::query::compiler::CompiledStatement;
use crate::query::specification::SqlValue;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while compiling or executing a statement, or decoding its rows.
#[derive(Debug)]
pub enum StorageError {
    /// Backend rejected the statement (connectivity, constraint, syntax).
    Db(DbError),
    /// Statement could not be built from the given identifiers/values.
    MalformedStatement(String),
    /// Result row does not carry the requested column.
    MissingColumn(String),
    /// Result column holds a value of an unexpected kind.
    UnexpectedValue {
        column: String,
        expected: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MalformedStatement(message) => write!(f, "malformed statement: {message}"),
            Self::MissingColumn(column) => write!(f, "result row has no column `{column}`"),
            Self::UnexpectedValue { column, expected } => {
                write!(f, "column `{column}` does not hold {expected}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One result row keyed by bare column name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    values: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new(values: Vec<(String, SqlValue)>) -> Self {
        Self { values }
    }

    pub fn value(&self, column: &str) -> StorageResult<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| StorageError::MissingColumn(column.to_string()))
    }

    pub fn get_i64(&self, column: &str) -> StorageResult<i64> {
        match self.value(column)? {
            SqlValue::Integer(value) => Ok(*value),
            _ => Err(StorageError::UnexpectedValue {
                column: column.to_string(),
                expected: "an integer",
            }),
        }
    }

    pub fn get_text(&self, column: &str) -> StorageResult<String> {
        match self.value(column)? {
            SqlValue::Text(value) => Ok(value.clone()),
            _ => Err(StorageError::UnexpectedValue {
                column: column.to_string(),
                expected: "text",
            }),
        }
    }
}

/// Executes compiled statements against a backend.
pub trait Storage {
    /// Runs a write statement and returns the affected row count.
    fn execute(&self, statement: &CompiledStatement) -> StorageResult<usize>;
    /// Runs a select statement and returns all rows in backend order.
    fn fetch(&self, statement: &CompiledStatement) -> StorageResult<Vec<Row>>;
}

/// Hands out fresh identities per named sequence.
pub trait IdSource {
    fn next_id(&self, sequence: &str) -> StorageResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::{Row, StorageError};
    use crate::query::specification::SqlValue;

    #[test]
    fn typed_getters_reject_wrong_kinds() {
        let row = Row::new(vec![
            ("seat_id".to_string(), SqlValue::Integer(7)),
            ("status".to_string(), SqlValue::Text("free".to_string())),
            ("theater_id".to_string(), SqlValue::Null),
        ]);

        assert_eq!(row.get_i64("seat_id").unwrap(), 7);
        assert_eq!(row.get_text("status").unwrap(), "free");
        assert!(row.get_i64("theater_id").is_err());
        assert!(matches!(
            row.get_i64("status"),
            Err(StorageError::UnexpectedValue { .. })
        ));
        assert!(matches!(
            row.get_text("missing"),
            Err(StorageError::MissingColumn(column)) if column == "missing"
        ));
    }
}
