//! Generic repository contract and its error type.

use crate::query::specification::{ColumnRef, Specification};
use crate::repo::entity::{DanglingReference, TableEntity};
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for repository persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Statement compilation or execution failed.
    Storage(StorageError),
    /// No row matched where exactly one was expected.
    NotFound {
        entity: &'static str,
        filter: String,
    },
    /// A value required for the write has not been assigned yet.
    MissingId(ColumnRef),
    /// A stored reference could not be resolved and the policy is `Fail`.
    IntegrityViolation(DanglingReference),
    /// Persisted data cannot be converted into a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound { entity, filter } => write!(f, "{entity} not found: {filter}"),
            Self::MissingId(column) => write!(f, "missing value for `{column}`"),
            Self::IntegrityViolation(reference) => write!(f, "{reference}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// What `query` does with a row whose reference cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Omit the row and log a warning.
    #[default]
    Skip,
    /// Abort the query with `RepoError::IntegrityViolation`.
    Fail,
}

/// Uniform CRUD contract over one entity type.
pub trait Repository<T: TableEntity> {
    /// Assigns a fresh identity to `item` and persists every mapped column.
    ///
    /// On failure `item` keeps the identity it had before the call.
    fn add(&self, item: &mut T) -> RepoResult<i64>;

    /// Adds items one by one.
    ///
    /// Not atomic: when an item fails, the items before it stay persisted.
    fn add_all(&self, items: &mut [T]) -> RepoResult<()> {
        for item in items.iter_mut() {
            self.add(item)?;
        }
        Ok(())
    }

    /// Persists every mapped column for the item's identity.
    ///
    /// Returns `NotFound` when no row carries that identity.
    fn update(&self, item: &T) -> RepoResult<()>;

    /// Deletes the row carrying the item's identity.
    fn remove(&self, item: &T) -> RepoResult<()>;

    /// Deletes every matching row and returns how many were removed.
    fn remove_matching(&self, spec: &Specification) -> RepoResult<usize>;

    /// Returns every matching entity ordered by identity.
    fn query(&self, spec: &Specification) -> RepoResult<Vec<T>>;

    /// Returns the first matching entity or `NotFound`.
    fn query_one(&self, spec: &Specification) -> RepoResult<T> {
        self.query(spec)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound {
                entity: T::ENTITY,
                filter: spec.to_string(),
            })
    }
}
