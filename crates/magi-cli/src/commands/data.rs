//! Backup, restore and first-run seeding.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use magi_core::storage::{export_document, export_file_name, import_document};
use magi_core::{seed_if_empty, Backend, Identity, SeedPlan, Tracker};

pub fn export<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(now)));
    let document = export_document(tracker.state()?, now)?;
    std::fs::write(&path, document)?;
    println!("{}", path.display());
    Ok(())
}

pub fn import<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = import_document(path)?;
    tracker.import_state(&state)?;
    let imported = tracker.state()?;
    println!(
        "imported {} habits, {} completions, {} books, {} goals",
        imported.habits.len(),
        imported.completions.len(),
        imported.books.len(),
        imported.goals.len()
    );
    Ok(())
}

pub fn seed<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    plan: &Path,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = SeedPlan::load(plan)?;
    let report = seed_if_empty(tracker, &plan, today)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
