//! Local snapshot backend: the whole state tree as one JSON blob.
//!
//! The blob lives at `<data dir>/magi_2026_state.json`. It is read once on
//! open and rewritten on every change through a temporary file and a
//! rename, so a crash never leaves half a snapshot behind. Missing or
//! unknown fields fall back to their defaults when reading.
//!
//! The snapshot holds a single user's data; the `owner` argument of the
//! [`Backend`] methods is not used to partition it.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Backend, NaturalKey, Record};
use crate::error::StoreError;
use crate::model::AppState;

/// Well-known key of the snapshot blob.
pub const SNAPSHOT_KEY: &str = "magi_2026_state";

pub struct SnapshotStore {
    path: Option<PathBuf>,
    state: AppState,
}

impl SnapshotStore {
    /// Open the snapshot in `dir`, starting empty if there is none yet.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Self::open_file(dir.join(format!("{SNAPSHOT_KEY}.json")))
    }

    pub fn open_file(path: PathBuf) -> Result<Self, StoreError> {
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Snapshot {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppState::default(),
            Err(e) => {
                return Err(StoreError::Snapshot {
                    path,
                    message: e.to_string(),
                })
            }
        };
        debug!(path = %path.display(), "opened snapshot");
        Ok(Self {
            path: Some(path),
            state,
        })
    }

    /// Snapshot that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: AppState::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Replace the whole tree, e.g. from an imported backup.
    pub fn replace(&mut self, state: AppState) -> Result<(), StoreError> {
        self.persist(&state)?;
        self.state = state;
        Ok(())
    }

    fn persist(&self, state: &AppState) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot_err = |message: String| StoreError::Snapshot {
            path: path.clone(),
            message,
        };
        let content = serde_json::to_string(state).map_err(|e| snapshot_err(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| snapshot_err(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| snapshot_err(e.to_string()))
    }

    /// Apply `change` to a copy, persist it, then adopt it.
    fn mutate<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut AppState) -> Result<(), StoreError>,
    {
        let mut next = self.state.clone();
        change(&mut next)?;
        self.persist(&next)?;
        self.state = next;
        Ok(())
    }
}

fn same_key<R: Record>(row: &R, key: &NaturalKey) -> bool {
    row.natural_key().as_ref() == Some(key)
}

impl Backend for SnapshotStore {
    fn list<R: Record>(&self, _owner: &str) -> Result<Vec<R>, StoreError> {
        Ok(R::rows(&self.state).clone())
    }

    fn insert<R: Record>(&mut self, _owner: &str, record: &R) -> Result<(), StoreError> {
        self.mutate(|state| {
            let rows = R::rows_mut(state);
            if rows.iter().any(|r| r.id() == record.id()) {
                return Err(StoreError::Constraint {
                    collection: R::COLLECTION.table(),
                    message: format!("duplicate id {}", record.id()),
                });
            }
            if let Some(key) = record.natural_key() {
                if rows.iter().any(|r| same_key(r, &key)) {
                    return Err(StoreError::Constraint {
                        collection: R::COLLECTION.table(),
                        message: format!("duplicate key {key}"),
                    });
                }
            }
            rows.push(record.clone());
            Ok(())
        })
    }

    fn update<R: Record>(&mut self, _owner: &str, record: &R) -> Result<(), StoreError> {
        self.mutate(|state| {
            if let Some(row) = R::rows_mut(state).iter_mut().find(|r| r.id() == record.id()) {
                *row = record.clone();
            }
            Ok(())
        })
    }

    fn delete<R: Record>(&mut self, _owner: &str, id: &str) -> Result<(), StoreError> {
        self.mutate(|state| {
            R::rows_mut(state).retain(|r| r.id() != id);
            Ok(())
        })
    }

    fn upsert<R: Record>(&mut self, _owner: &str, record: &R) -> Result<(), StoreError> {
        self.mutate(|state| {
            let rows = R::rows_mut(state);
            let existing = match record.natural_key() {
                Some(key) => rows.iter_mut().find(|r| same_key(&**r, &key)),
                None => rows.iter_mut().find(|r| r.id() == record.id()),
            };
            match existing {
                Some(row) => *row = record.clone(),
                None => rows.push(record.clone()),
            }
            Ok(())
        })
    }

    fn delete_by_key<R: Record>(
        &mut self,
        _owner: &str,
        key: &NaturalKey,
    ) -> Result<(), StoreError> {
        self.mutate(|state| {
            R::rows_mut(state).retain(|r| !same_key(r, key));
            Ok(())
        })
    }

    fn load_state(&self, _owner: &str) -> Result<AppState, StoreError> {
        Ok(self.state.clone())
    }

    fn replace_all(&mut self, _owner: &str, state: &AppState) -> Result<(), StoreError> {
        self.replace(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Completion, Habit, HabitCategory, MoodLog, Recurrence};

    fn date(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert!(store.state().is_empty());
        assert!(store.path().unwrap().ends_with("magi_2026_state.json"));
    }

    #[test]
    fn changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let habit = Habit::new("Lectura diaria", HabitCategory::Reading, Recurrence::Daily).unwrap();
        {
            let mut store = SnapshotStore::open(dir.path()).unwrap();
            store.insert("local", &habit).unwrap();
        }
        let store = SnapshotStore::open(dir.path()).unwrap();
        let habits: Vec<Habit> = store.list("local").unwrap();
        assert_eq!(habits, vec![habit]);
        assert!(!dir.path().join("magi_2026_state.json.tmp").exists());
    }

    #[test]
    fn older_snapshot_without_collections_loads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("magi_2026_state.json"),
            r#"{"habits":[{"id":"h1","name":"Leer","extra":1}],"darkMode":true}"#,
        )
        .unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert_eq!(store.state().habits.len(), 1);
        assert!(store.state().books.is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("magi_2026_state.json"), "{not json").unwrap();
        assert!(matches!(
            SnapshotStore::open(dir.path()),
            Err(StoreError::Snapshot { .. })
        ));
    }

    #[test]
    fn upsert_overwrites_on_natural_key() {
        let mut store = SnapshotStore::in_memory();
        let first = Completion::new("h1", date("2026-01-07"));
        let mut second = Completion::new("h1", date("2026-01-07"));
        second.notes = Some("again".into());
        store.upsert("local", &first).unwrap();
        store.upsert("local", &second).unwrap();

        let rows: Vec<Completion> = store.list("local").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes.as_deref(), Some("again"));
    }

    #[test]
    fn insert_rejects_duplicate_key_and_leaves_state() {
        let mut store = SnapshotStore::in_memory();
        store
            .insert("local", &MoodLog::new(date("2026-02-01"), 7, None, None).unwrap())
            .unwrap();
        let err = store
            .insert("local", &MoodLog::new(date("2026-02-01"), 3, None, None).unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }));
        assert_eq!(store.state().moods.len(), 1);
        assert_eq!(store.state().moods[0].mood_score, 7);
    }

    #[test]
    fn delete_by_key_removes_only_matching_rows() {
        let mut store = SnapshotStore::in_memory();
        store.upsert("local", &Completion::new("h1", date("2026-01-06"))).unwrap();
        store.upsert("local", &Completion::new("h1", date("2026-01-07"))).unwrap();
        store
            .delete_by_key::<Completion>("local", &NaturalKey::completion("h1", date("2026-01-07")))
            .unwrap();
        let rows: Vec<Completion> = store.list("local").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date("2026-01-06"));
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path()).unwrap();
        store.insert("local", &Completion::new("h1", date("2026-01-06"))).unwrap();
        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(dir.path().join("magi_2026_state.json.tmp")).unwrap();
        assert!(store.insert("local", &Completion::new("h1", date("2026-01-07"))).is_err());
        assert_eq!(store.state().completions.len(), 1);
    }
}
