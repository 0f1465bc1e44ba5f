//! SQLite transport for compiled statements and id sequences.
//!
//! # Responsibility
//! - Execute compiled statements with their bound parameters.
//! - Convert result rows into backend-neutral `Row` values.
//! - Emulate named sequences on top of the `id_sequences` table.
//!
//! # Invariants
//! - Bound parameter values are never logged.
//! - `next_id` is a single atomic upsert; ids are never handed out twice.

use crate::query::compiler::CompiledStatement;
use crate::query::specification::SqlValue;
use crate::storage::{IdSource, Row, Storage, StorageError, StorageResult};
use log::debug;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            SqlValue::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

/// Storage transport and id source over one borrowed connection.
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStorage<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Storage for SqliteStorage<'_> {
    fn execute(&self, statement: &CompiledStatement) -> StorageResult<usize> {
        let affected = self
            .conn
            .execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        debug!(
            "event=sql_execute module=storage status=ok affected={} sql={}",
            affected, statement.sql
        );
        Ok(affected)
    }

    fn fetch(&self, statement: &CompiledStatement) -> StorageResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                let value = match row.get_ref(index)? {
                    ValueRef::Null => SqlValue::Null,
                    ValueRef::Integer(value) => SqlValue::Integer(value),
                    ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                        Ok(text) => SqlValue::Text(text.to_string()),
                        Err(_) => {
                            return Err(StorageError::UnexpectedValue {
                                column: name.clone(),
                                expected: "valid UTF-8 text",
                            });
                        }
                    },
                    ValueRef::Real(_) | ValueRef::Blob(_) => {
                        return Err(StorageError::UnexpectedValue {
                            column: name.clone(),
                            expected: "an integer, text or NULL",
                        });
                    }
                };
                values.push((name.clone(), value));
            }
            items.push(Row::new(values));
        }

        debug!(
            "event=sql_fetch module=storage status=ok rows={} sql={}",
            items.len(),
            statement.sql
        );
        Ok(items)
    }
}

impl IdSource for SqliteStorage<'_> {
    fn next_id(&self, sequence: &str) -> StorageResult<i64> {
        let id = self.conn.query_row(
            "INSERT INTO id_sequences (name, value) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET value = value + 1
             RETURNING value;",
            [sequence],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(id)
    }
}
