//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema and reference-data migrations in increasing order.
//! - Apply pending migrations in one transaction.
//! - Refuse to hand out a database whose role or film-type tables are empty.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Seeded reference rows advance their id sequence past the seeded ids.

use crate::db::schema::{film_types, user_roles};
use crate::db::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_reference_data.sql"),
    },
];

/// Tables every reservation flow reads by seeded id.
const REFERENCE_TABLES: &[&str] = &[user_roles::TABLE, film_types::TABLE];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    last_version(MIGRATIONS)
}

/// Applies all pending migrations, then checks the seeded reference tables.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    upgrade(conn, MIGRATIONS)?;
    verify_reference_data(conn)
}

fn last_version(migrations: &[Migration]) -> u32 {
    migrations.last().map_or(0, |migration| migration.version)
}

fn upgrade(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = last_version(migrations);

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        debug!("event=db_migrate module=db status=skipped version={current_version}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in migrations
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        let script = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        if let Err(source) = tx.execute_batch(&script) {
            error!(
                "event=db_migrate module=db status=error version={} error={}",
                migration.version, source
            );
            return Err(DbError::Migration {
                version: migration.version,
                source,
            });
        }
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn verify_reference_data(conn: &Connection) -> DbResult<()> {
    for &table in REFERENCE_TABLES {
        let seeded: bool = conn.query_row(
            &format!("SELECT EXISTS (SELECT 1 FROM {table});"),
            [],
            |row| row.get(0),
        )?;
        if !seeded {
            return Err(DbError::MissingReferenceData { table });
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROKEN: &[Migration] = &[
        Migration {
            version: 1,
            sql: "CREATE TABLE halls (hall_id INTEGER PRIMARY KEY);",
        },
        Migration {
            version: 2,
            sql: "CREATE TABLE broken (;",
        },
    ];

    #[test]
    fn failing_script_names_its_version_and_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();

        match upgrade(&mut conn, BROKEN).unwrap_err() {
            DbError::Migration { version, .. } => assert_eq!(version, 2),
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let halls: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'halls';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(halls, 0);
    }

    #[test]
    fn versions_at_or_below_current_are_skipped() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 2;").unwrap();

        upgrade(&mut conn, BROKEN).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 2);
    }

    #[test]
    fn empty_reference_table_is_reported() {
        let mut conn = Connection::open_in_memory().unwrap();
        upgrade(&mut conn, MIGRATIONS).unwrap();
        verify_reference_data(&conn).unwrap();

        conn.execute_batch("DELETE FROM film_types;").unwrap();
        assert!(matches!(
            verify_reference_data(&conn).unwrap_err(),
            DbError::MissingReferenceData { table: "film_types" }
        ));
    }
}
