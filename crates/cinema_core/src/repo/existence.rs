//! Existence oracle used for insert-vs-update decisions.
//!
//! # Invariants
//! - The answer is computed against storage at call time and never cached.
//! - An entity without identity is never persisted.

use crate::query::compiler::QueryCompiler;
use crate::query::factory::SpecificationFactory;
use crate::query::specification::ColumnRef;
use crate::repo::entity::TableEntity;
use crate::repo::repository::RepoResult;
use crate::storage::Storage;

/// Identity of one entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKey {
    pub id_column: ColumnRef,
    pub id: Option<i64>,
}

impl EntityKey {
    pub fn of<T: TableEntity>(item: &T) -> Self {
        Self {
            id_column: T::ID,
            id: item.id(),
        }
    }
}

/// Answers whether a row with the given identity currently exists.
pub trait ExistenceOracle {
    fn is_persisted(&self, key: EntityKey) -> RepoResult<bool>;
}

/// Oracle issuing one id lookup per question.
pub struct SqlExistenceOracle<'conn> {
    compiler: &'conn dyn QueryCompiler,
    storage: &'conn dyn Storage,
    factory: SpecificationFactory,
}

impl<'conn> SqlExistenceOracle<'conn> {
    pub fn new(compiler: &'conn dyn QueryCompiler, storage: &'conn dyn Storage) -> Self {
        Self {
            compiler,
            storage,
            factory: SpecificationFactory,
        }
    }
}

impl ExistenceOracle for SqlExistenceOracle<'_> {
    fn is_persisted(&self, key: EntityKey) -> RepoResult<bool> {
        let Some(id) = key.id else {
            return Ok(false);
        };
        let statement = self.compiler.compile_select(
            &[key.id_column],
            &self.factory.by_id_column(key.id_column, id),
        )?;
        Ok(!self.storage.fetch(&statement)?.is_empty())
    }
}
