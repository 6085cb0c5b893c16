//! Backup documents: the full state tree plus an export timestamp.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(flatten)]
    pub state: AppState,
    pub export_date: DateTime<Utc>,
}

/// `magi-backup-YYYY-MM-DD.json`, stamped with the export date.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("magi-backup-{}.json", now.format("%Y-%m-%d"))
}

/// Pretty-printed JSON of `state`.
pub fn export_document(state: &AppState, now: DateTime<Utc>) -> Result<String> {
    let doc = ExportDocument {
        state: state.clone(),
        export_date: now,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Read a backup back. Collections missing from the file come back empty.
pub fn import_document(path: &Path) -> Result<AppState> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
