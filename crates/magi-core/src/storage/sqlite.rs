//! SQLite backend.
//!
//! One table per collection, rows scoped by `owner_id`. Each row stores the
//! record as JSON next to the columns needed for scoping and upserts.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use super::{migrations, Backend, NaturalKey, Record};
use crate::error::StoreError;

/// SQLite database for tracker records.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open `magi.db` in `dir`, creating and migrating it as needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Self::open_path(&dir.join("magi.db"))
    }

    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened sqlite store");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }
}

fn encode<R: Record>(record: &R) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::Decode {
        collection: R::COLLECTION.table(),
        message: e.to_string(),
    })
}

/// Attach the collection name to constraint failures.
fn scoped<R: Record>(err: rusqlite::Error) -> StoreError {
    match StoreError::from(err) {
        StoreError::Constraint { message, .. } => StoreError::Constraint {
            collection: R::COLLECTION.table(),
            message,
        },
        other => other,
    }
}

impl Backend for SqliteStore {
    fn list<R: Record>(&self, owner: &str) -> Result<Vec<R>, StoreError> {
        let table = R::COLLECTION.table();
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT data FROM {table} WHERE owner_id = ?1 ORDER BY rowid"
            ))
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([owner], |row| row.get::<_, String>(0))
            .map_err(StoreError::from)?;

        let mut records = Vec::new();
        for row in rows {
            let data = row.map_err(StoreError::from)?;
            let record = serde_json::from_str(&data).map_err(|e| StoreError::Decode {
                collection: table,
                message: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn insert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, owner_id, natural_key, data, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    R::COLLECTION.table()
                ),
                params![
                    record.id(),
                    owner,
                    record.natural_key().map(|k| k.to_string()),
                    encode(record)?,
                    now,
                ],
            )
            .map_err(scoped::<R>)?;
        Ok(())
    }

    fn update<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        self.conn
            .execute(
                &format!(
                    "UPDATE {} SET natural_key = ?3, data = ?4, updated_at = ?5
                     WHERE owner_id = ?1 AND id = ?2",
                    R::COLLECTION.table()
                ),
                params![
                    owner,
                    record.id(),
                    record.natural_key().map(|k| k.to_string()),
                    encode(record)?,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(scoped::<R>)?;
        Ok(())
    }

    fn delete<R: Record>(&mut self, owner: &str, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                &format!(
                    "DELETE FROM {} WHERE owner_id = ?1 AND id = ?2",
                    R::COLLECTION.table()
                ),
                params![owner, id],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn upsert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        let target = if record.natural_key().is_some() {
            "owner_id, natural_key"
        } else {
            "owner_id, id"
        };
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, owner_id, natural_key, data, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                     ON CONFLICT ({target}) DO UPDATE SET
                        id = excluded.id,
                        data = excluded.data,
                        updated_at = excluded.updated_at",
                    R::COLLECTION.table()
                ),
                params![
                    record.id(),
                    owner,
                    record.natural_key().map(|k| k.to_string()),
                    encode(record)?,
                    now,
                ],
            )
            .map_err(scoped::<R>)?;
        Ok(())
    }

    fn delete_by_key<R: Record>(
        &mut self,
        owner: &str,
        key: &NaturalKey,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                &format!(
                    "DELETE FROM {} WHERE owner_id = ?1 AND natural_key = ?2",
                    R::COLLECTION.table()
                ),
                params![owner, key.to_string()],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }
}
