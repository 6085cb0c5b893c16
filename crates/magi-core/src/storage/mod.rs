//! Persistence: the backend contract and its implementations.
//!
//! Three backends share one canonical schema:
//! - [`SnapshotStore`]: a single JSON blob on disk (the offline variant)
//! - [`SqliteStore`]: one table per collection with owner scoping
//! - [`RestStore`]: a hosted PostgREST endpoint
//!
//! Configuration lives next to the data in `config.toml`.

mod config;
pub mod export;
pub mod migrations;
pub mod record;
pub mod rest;
pub mod snapshot;
pub mod sqlite;

pub use config::{BackendKind, Config, RemoteConfig, StorageConfig, StreakConfig, UiConfig};
pub use export::{export_document, export_file_name, import_document, ExportDocument};
pub use record::{Collection, NaturalKey, Record};
pub use rest::RestStore;
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};
use crate::model::AppState;

/// Returns `~/.config/magi[-dev]/`.
///
/// Set MAGI_ENV=dev to use the development data directory, or
/// MAGI_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MAGI_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MAGI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("magi-dev")
            } else {
                base_dir.join("magi")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Owner-scoped access to every collection.
///
/// Upserts overwrite the row sharing the record's natural key, or insert
/// when there is none. Updates and deletes of unknown ids are no-ops.
pub trait Backend {
    fn list<R: Record>(&self, owner: &str) -> Result<Vec<R>, StoreError>;

    fn insert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError>;

    fn update<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError>;

    fn delete<R: Record>(&mut self, owner: &str, id: &str) -> Result<(), StoreError>;

    fn upsert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError>;

    fn delete_by_key<R: Record>(&mut self, owner: &str, key: &NaturalKey)
        -> Result<(), StoreError>;

    /// Full state tree for `owner`, one `list` per collection.
    fn load_state(&self, owner: &str) -> Result<AppState, StoreError> {
        Ok(AppState {
            habits: self.list(owner)?,
            completions: self.list(owner)?,
            books: self.list(owner)?,
            exercises: self.list(owner)?,
            phases: self.list(owner)?,
            workouts: self.list(owner)?,
            goals: self.list(owner)?,
            milestones: self.list(owner)?,
            monthly_tracking: self.list(owner)?,
            moods: self.list(owner)?,
        })
    }

    /// Make `owner`'s data equal to `state`, one collection at a time.
    ///
    /// Not atomic: a failure part way leaves earlier collections replaced.
    fn replace_all(&mut self, owner: &str, state: &AppState) -> Result<(), StoreError> {
        self.replace_rows(owner, &state.habits)?;
        self.replace_rows(owner, &state.completions)?;
        self.replace_rows(owner, &state.books)?;
        self.replace_rows(owner, &state.exercises)?;
        self.replace_rows(owner, &state.phases)?;
        self.replace_rows(owner, &state.workouts)?;
        self.replace_rows(owner, &state.goals)?;
        self.replace_rows(owner, &state.milestones)?;
        self.replace_rows(owner, &state.monthly_tracking)?;
        self.replace_rows(owner, &state.moods)
    }

    fn replace_rows<R: Record>(&mut self, owner: &str, rows: &[R]) -> Result<(), StoreError> {
        for old in self.list::<R>(owner)? {
            self.delete::<R>(owner, old.id())?;
        }
        for row in rows {
            self.insert(owner, row)?;
        }
        Ok(())
    }
}
