//! Repository implementation over the query compiler and storage transport.
//!
//! # Responsibility
//! - Implement `Repository<T>` once for every `TableEntity`.
//! - Apply the integrity policy to rows whose references do not resolve.
//!
//! # Invariants
//! - Each call compiles and executes its own statements; no state is kept
//!   between calls.
//! - `add` restores the previous identity when the insert is rejected.

use crate::config::PersistenceConfig;
use crate::query::compiler::QueryCompiler;
use crate::query::factory::SpecificationFactory;
use crate::query::specification::Specification;
use crate::repo::entity::{DirectRows, FromRow, MapOutcome, RowMapper, TableEntity};
use crate::repo::repository::{IntegrityPolicy, RepoError, RepoResult, Repository};
use crate::storage::{IdSource, Storage};
use log::{debug, warn};

/// Collaborators shared by every SQL-backed repository.
#[derive(Clone, Copy)]
pub struct SqlContext<'conn> {
    pub compiler: &'conn dyn QueryCompiler,
    pub storage: &'conn dyn Storage,
    pub ids: &'conn dyn IdSource,
    pub policy: IntegrityPolicy,
}

impl<'conn> SqlContext<'conn> {
    pub fn new(
        compiler: &'conn dyn QueryCompiler,
        storage: &'conn dyn Storage,
        ids: &'conn dyn IdSource,
        policy: IntegrityPolicy,
    ) -> Self {
        Self {
            compiler,
            storage,
            ids,
            policy,
        }
    }

    /// Builds a context that applies the configured integrity policy.
    pub fn from_config(
        compiler: &'conn dyn QueryCompiler,
        storage: &'conn dyn Storage,
        ids: &'conn dyn IdSource,
        config: &PersistenceConfig,
    ) -> Self {
        Self::new(compiler, storage, ids, config.integrity_policy)
    }
}

/// SQL-backed repository for one entity type.
pub struct SqlRepository<'conn, T> {
    ctx: SqlContext<'conn>,
    factory: SpecificationFactory,
    mapper: Box<dyn RowMapper<T> + 'conn>,
}

impl<'conn, T: TableEntity + FromRow> SqlRepository<'conn, T> {
    /// Creates a repository for entities that map straight from their row.
    pub fn new(ctx: SqlContext<'conn>) -> Self {
        Self::with_mapper(ctx, DirectRows)
    }
}

impl<'conn, T: TableEntity> SqlRepository<'conn, T> {
    /// Creates a repository with a custom row mapper.
    pub fn with_mapper(ctx: SqlContext<'conn>, mapper: impl RowMapper<T> + 'conn) -> Self {
        Self {
            ctx,
            factory: SpecificationFactory,
            mapper: Box::new(mapper),
        }
    }

    fn insert_row(&self, item: &T) -> RepoResult<()> {
        let statement = self
            .ctx
            .compiler
            .compile_insert(T::TABLE, &item.column_values()?)?;
        self.ctx.storage.execute(&statement)?;
        Ok(())
    }

    fn missing(&self, id: i64) -> RepoError {
        RepoError::NotFound {
            entity: T::ENTITY,
            filter: self.factory.by_id::<T>(id).to_string(),
        }
    }
}

impl<T: TableEntity> Repository<T> for SqlRepository<'_, T> {
    fn add(&self, item: &mut T) -> RepoResult<i64> {
        let id = self.ctx.ids.next_id(T::SEQUENCE)?;
        let previous = item.id();
        item.set_id(Some(id));

        if let Err(err) = self.insert_row(item) {
            item.set_id(previous);
            return Err(err);
        }

        debug!(
            "event=entity_add module=repo status=ok entity={} id={}",
            T::TABLE,
            id
        );
        Ok(id)
    }

    fn update(&self, item: &T) -> RepoResult<()> {
        let id = item.id().ok_or(RepoError::MissingId(T::ID))?;
        let statement = self
            .ctx
            .compiler
            .compile_update(T::TABLE, &item.column_values()?)?;
        let changed = self.ctx.storage.execute(&statement)?;
        if changed == 0 {
            return Err(self.missing(id));
        }

        debug!(
            "event=entity_update module=repo status=ok entity={} id={}",
            T::TABLE,
            id
        );
        Ok(())
    }

    fn remove(&self, item: &T) -> RepoResult<()> {
        let id = item.id().ok_or(RepoError::MissingId(T::ID))?;
        if self.remove_matching(&self.factory.by_id::<T>(id))? == 0 {
            return Err(self.missing(id));
        }
        Ok(())
    }

    fn remove_matching(&self, spec: &Specification) -> RepoResult<usize> {
        let statement = self.ctx.compiler.compile_delete(T::TABLE, spec)?;
        let removed = self.ctx.storage.execute(&statement)?;
        debug!(
            "event=entity_remove module=repo status=ok entity={} removed={}",
            T::TABLE,
            removed
        );
        Ok(removed)
    }

    fn query(&self, spec: &Specification) -> RepoResult<Vec<T>> {
        let statement = self.ctx.compiler.compile_select(T::COLUMNS, spec)?;
        let rows = self.ctx.storage.fetch(&statement)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            match self.mapper.map_row(row)? {
                MapOutcome::Mapped(item) => items.push(item),
                MapOutcome::Dangling(reference) => match self.ctx.policy {
                    IntegrityPolicy::Skip => {
                        warn!(
                            "event=dangling_reference module=repo status=skipped entity={} id={} reference={} reference_id={}",
                            T::TABLE,
                            reference.entity_id,
                            reference.reference,
                            reference.reference_id
                        );
                    }
                    IntegrityPolicy::Fail => return Err(RepoError::IntegrityViolation(reference)),
                },
            }
        }

        Ok(items)
    }
}
