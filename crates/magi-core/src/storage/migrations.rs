//! Database schema migrations for the SQLite backend.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{info, warn};

use super::record::Collection;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (fresh database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: one table per collection.
///
/// Records are stored as JSON in `data`. `natural_key` carries the upsert
/// key for collections that declare one and is NULL otherwise; SQLite
/// treats NULLs as distinct, so the UNIQUE constraint only binds keyed rows.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    for collection in Collection::ALL {
        let table = collection.table();
        tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id          TEXT NOT NULL,
                owner_id    TEXT NOT NULL,
                natural_key TEXT,
                data        TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                PRIMARY KEY (owner_id, id),
                UNIQUE (owner_id, natural_key)
            );"
        ))?;
    }

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    info!("applied schema migration v1");
    Ok(())
}

/// Migration v2: track the last modification of each row.
///
/// Existing rows are backfilled with their creation time.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    for collection in Collection::ALL {
        let table = collection.table();
        tx.execute_batch(&format!(
            "ALTER TABLE {table} ADD COLUMN updated_at TEXT;
             UPDATE {table} SET updated_at = created_at WHERE updated_at IS NULL;"
        ))?;
    }

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    info!("applied schema migration v2");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        for collection in Collection::ALL {
            let cols = columns(&conn, collection.table());
            assert!(cols.contains(&"natural_key".to_string()));
            assert!(cols.contains(&"updated_at".to_string()));
        }
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_incremental_migration_backfills_updated_at() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO habits (id, owner_id, data, created_at)
             VALUES ('h1', 'local', '{\"id\":\"h1\",\"name\":\"Leer\"}', '2026-01-01T08:00:00+00:00')",
            [],
        )
        .unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);
        let updated_at: String = conn
            .query_row("SELECT updated_at FROM habits WHERE id = 'h1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(updated_at, "2026-01-01T08:00:00+00:00");
    }
}
