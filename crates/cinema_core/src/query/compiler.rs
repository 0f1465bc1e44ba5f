//! Specification and column-map compilation into bound SQL statements.
//!
//! # Responsibility
//! - Turn a column list plus a specification into a select statement.
//! - Turn an entity column map into insert/update statements.
//! - Turn a specification into a delete statement.
//!
//! # Invariants
//! - Values are always bound as `?N` parameters, never spliced into SQL text.
//! - Identifiers must match `[A-Za-z_][A-Za-z0-9_]*`.
//! - Select output columns are aliased to their bare names and ordered by the
//!   first requested column.

use crate::query::specification::{ColumnRef, Condition, SpecNode, Specification, SqlValue};
use crate::storage::{StorageError, StorageResult};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex")
});

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Column/value pairs of one entity row, keyed by its id column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValues {
    id_column: &'static str,
    values: Vec<(&'static str, SqlValue)>,
}

impl ColumnValues {
    pub fn new(id_column: &'static str) -> Self {
        Self {
            id_column,
            values: Vec::new(),
        }
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    pub fn id_column(&self) -> &'static str {
        self.id_column
    }

    pub fn id_value(&self) -> Option<&SqlValue> {
        self.get(self.id_column)
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, SqlValue)> {
        self.values.iter()
    }
}

/// Builds backend statements from specifications and column maps.
pub trait QueryCompiler {
    fn compile_select(
        &self,
        columns: &[ColumnRef],
        spec: &Specification,
    ) -> StorageResult<CompiledStatement>;
    fn compile_insert(&self, table: &str, values: &ColumnValues)
        -> StorageResult<CompiledStatement>;
    fn compile_update(&self, table: &str, values: &ColumnValues)
        -> StorageResult<CompiledStatement>;
    fn compile_delete(&self, table: &str, spec: &Specification)
        -> StorageResult<CompiledStatement>;
}

/// Compiler emitting SQLite-compatible SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCompiler;

impl QueryCompiler for SqlCompiler {
    fn compile_select(
        &self,
        columns: &[ColumnRef],
        spec: &Specification,
    ) -> StorageResult<CompiledStatement> {
        let first = columns
            .first()
            .ok_or_else(|| StorageError::MalformedStatement("select without columns".into()))?;

        let mut tables: Vec<&'static str> = Vec::new();
        let mut select_list = Vec::with_capacity(columns.len());
        for column in columns {
            check_column(column)?;
            if !tables.contains(&column.table) {
                tables.push(column.table);
            }
            select_list.push(format!("{column} AS {}", column.column));
        }
        for table in spec.tables() {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }

        let mut params = Vec::new();
        let mut sql = format!(
            "SELECT {}{} FROM {}",
            if tables.len() > 1 { "DISTINCT " } else { "" },
            select_list.join(", "),
            tables.join(", ")
        );
        if let Some(predicate) = render_where(spec, &mut params)? {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }
        sql.push_str(&format!(" ORDER BY {first} ASC;"));

        Ok(CompiledStatement { sql, params })
    }

    fn compile_insert(
        &self,
        table: &str,
        values: &ColumnValues,
    ) -> StorageResult<CompiledStatement> {
        check_identifier(table)?;
        let mut names = Vec::new();
        let mut placeholders = Vec::new();
        let mut params = Vec::new();
        for (column, value) in values.iter() {
            check_identifier(column)?;
            params.push(value.clone());
            names.push(*column);
            placeholders.push(format!("?{}", params.len()));
        }
        if names.is_empty() {
            return Err(StorageError::MalformedStatement(format!(
                "insert into `{table}` without columns"
            )));
        }

        Ok(CompiledStatement {
            sql: format!(
                "INSERT INTO {table} ({}) VALUES ({});",
                names.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    fn compile_update(
        &self,
        table: &str,
        values: &ColumnValues,
    ) -> StorageResult<CompiledStatement> {
        check_identifier(table)?;
        let id_column = values.id_column();
        check_identifier(id_column)?;
        let id_value = match values.id_value() {
            Some(SqlValue::Null) | None => {
                return Err(StorageError::MalformedStatement(format!(
                    "update of `{table}` without `{id_column}` value"
                )));
            }
            Some(value) => value.clone(),
        };

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for (column, value) in values.iter().filter(|(column, _)| *column != id_column) {
            check_identifier(column)?;
            params.push(value.clone());
            assignments.push(format!("{column} = ?{}", params.len()));
        }
        if assignments.is_empty() {
            return Err(StorageError::MalformedStatement(format!(
                "update of `{table}` without columns to set"
            )));
        }
        params.push(id_value);

        Ok(CompiledStatement {
            sql: format!(
                "UPDATE {table} SET {} WHERE {id_column} = ?{};",
                assignments.join(", "),
                params.len()
            ),
            params,
        })
    }

    fn compile_delete(
        &self,
        table: &str,
        spec: &Specification,
    ) -> StorageResult<CompiledStatement> {
        check_identifier(table)?;
        if let Some(other) = spec.tables().into_iter().find(|other| *other != table) {
            return Err(StorageError::MalformedStatement(format!(
                "delete from `{table}` cannot filter on table `{other}`"
            )));
        }

        let mut params = Vec::new();
        let mut sql = format!("DELETE FROM {table}");
        if let Some(predicate) = render_where(spec, &mut params)? {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }
        sql.push(';');

        Ok(CompiledStatement { sql, params })
    }
}

/// `None` when the specification matches every row.
fn render_where(spec: &Specification, params: &mut Vec<SqlValue>) -> StorageResult<Option<String>> {
    match spec.node() {
        SpecNode::Any => Ok(None),
        _ => render(spec, params).map(Some),
    }
}

fn render(spec: &Specification, params: &mut Vec<SqlValue>) -> StorageResult<String> {
    match spec.node() {
        SpecNode::Any => Ok("1 = 1".to_string()),
        SpecNode::Leaf { column, condition } => {
            check_column(column)?;
            match condition {
                Condition::Equals(SqlValue::Null) => Ok(format!("{column} IS NULL")),
                Condition::Equals(value) => {
                    params.push(value.clone());
                    Ok(format!("{column} = ?{}", params.len()))
                }
                Condition::EqualsColumn(other) => {
                    check_column(other)?;
                    Ok(format!("{column} = {other}"))
                }
                Condition::In(values) if values.is_empty() => Ok("0 = 1".to_string()),
                Condition::In(values) => {
                    let mut placeholders = Vec::with_capacity(values.len());
                    for value in values {
                        params.push(value.clone());
                        placeholders.push(format!("?{}", params.len()));
                    }
                    Ok(format!("{column} IN ({})", placeholders.join(", ")))
                }
            }
        }
        SpecNode::Composite { left, right, op } => {
            let left = render(left, params)?;
            let right = render(right, params)?;
            Ok(format!("({left} {} {right})", op.as_sql()))
        }
    }
}

fn check_column(column: &ColumnRef) -> StorageResult<()> {
    check_identifier(column.table)?;
    check_identifier(column.column)
}

fn check_identifier(name: &str) -> StorageResult<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(StorageError::MalformedStatement(format!(
            "invalid identifier `{name}`"
        )))
    }
}
