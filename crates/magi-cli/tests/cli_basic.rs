//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_magi"))
        .env("MAGI_DATA_DIR", data_dir)
        .env_remove("MAGI_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_ok(data_dir, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_habit_streak_flow() {
    let dir = tempfile::tempdir().unwrap();
    let habit = run_json(dir.path(), &["habit", "add", "Lectura diaria", "--category", "reading"]);
    let id = habit["id"].as_str().unwrap().to_string();
    assert_eq!(habit["frequency"], "daily");

    for day in ["2026-01-05", "2026-01-06", "2026-01-07"] {
        let check = run_json(dir.path(), &["--date", day, "habit", "check", &id]);
        assert_eq!(check["completed"], true);
    }

    let streak = run_ok(dir.path(), &["--date", "2026-01-07", "habit", "streak", &id]);
    assert_eq!(streak.trim(), "3");

    let today = run_json(dir.path(), &["--date", "2026-01-07", "stats", "today"]);
    assert_eq!(today["percentage"], 100);
}

#[test]
fn test_check_twice_clears_completion() {
    let dir = tempfile::tempdir().unwrap();
    let habit = run_json(dir.path(), &["habit", "add", "Italiano"]);
    let id = habit["id"].as_str().unwrap();

    run_ok(dir.path(), &["--date", "2026-01-07", "habit", "check", id]);
    let second = run_json(dir.path(), &["--date", "2026-01-07", "habit", "check", id]);
    assert_eq!(second["completed"], false);

    let today = run_json(dir.path(), &["--date", "2026-01-07", "stats", "today"]);
    assert_eq!(today["completed"], 0);
}

#[test]
fn test_weekly_habit_needs_valid_days() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["habit", "add", "Running", "--frequency", "weekly", "--days", "3,9"],
    );
    assert_ne!(code, 0);
    assert!(stderr.starts_with("error:"), "unexpected stderr: {stderr}");

    let habit = run_json(
        dir.path(),
        &["habit", "add", "Running", "--frequency", "weekly", "--days", "3,6"],
    );
    assert_eq!(habit["frequency_days"], serde_json::json!([3, 6]));
}

#[test]
fn test_unknown_habit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["habit", "check", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_current_book_by_date() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(
        dir.path(),
        &[
            "reading", "add", "La muerte de Iván Ilich", "--week", "2", "--block",
            "Reinicio del Hábito", "--start", "2026-01-05", "--end", "2026-01-11",
        ],
    );
    let current = run_json(dir.path(), &["--date", "2026-01-08", "reading", "current"]);
    assert_eq!(current["title"], "La muerte de Iván Ilich");
}

#[test]
fn test_mood_log_replaces_same_day() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["--date", "2026-02-01", "mood", "log", "5"]);
    run_ok(dir.path(), &["--date", "2026-02-01", "mood", "log", "8", "--energy", "7"]);
    let logs = run_json(dir.path(), &["mood", "list"]);
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["mood_score"], 8);
}

#[test]
fn test_dashboard_on_empty_data() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = run_json(dir.path(), &["--date", "2026-01-07", "dashboard"]);
    assert_eq!(dashboard["best_streak"], 0);
    assert!(dashboard["current_book"].is_null());
}

#[test]
fn test_export_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let backup = dir.path().join("backup.json");

    let habit = run_json(dir.path(), &["habit", "add", "Usar MAGI"]);
    let id = habit["id"].as_str().unwrap();
    run_ok(dir.path(), &["--date", "2026-01-07", "habit", "check", id]);
    run_ok(dir.path(), &["export", "--output", backup.to_str().unwrap()]);

    run_ok(other.path(), &["import", backup.to_str().unwrap()]);
    let streak = run_ok(other.path(), &["--date", "2026-01-07", "habit", "streak", id]);
    assert_eq!(streak.trim(), "1");
}

#[test]
fn test_seed_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.toml");
    std::fs::write(
        &plan,
        "[[habits]]\nname = \"Lectura diaria\"\n\n[[habits]]\nname = \"Descanso activo\"\nfrequency = \"weekly\"\ndays = [0]\n",
    )
    .unwrap();

    let first = run_json(dir.path(), &["seed", plan.to_str().unwrap()]);
    assert_eq!(first["seeded"], true);
    let second = run_json(dir.path(), &["seed", plan.to_str().unwrap()]);
    assert_eq!(second["seeded"], false);

    let habits = run_json(dir.path(), &["habit", "list"]);
    assert_eq!(habits.as_array().unwrap().len(), 2);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "storage.backend"]).trim(), "local");
    run_ok(dir.path(), &["config", "set", "streak.horizon_days", "30"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "streak.horizon_days"]).trim(), "30");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_sqlite_backend() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "storage.backend", "sqlite"]);
    let habit = run_json(dir.path(), &["habit", "add", "Leer"]);
    let id = habit["id"].as_str().unwrap();
    run_ok(dir.path(), &["--date", "2026-01-07", "habit", "check", id]);
    assert!(dir.path().join("magi.db").exists());

    let report = run_json(dir.path(), &["--date", "2026-01-07", "stats", "streaks"]);
    assert_eq!(report[0]["current_streak"], 1);
}

#[test]
fn test_habit_edit_changes_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let habit = run_json(dir.path(), &["habit", "add", "Running"]);
    let id = habit["id"].as_str().unwrap();

    let edited = run_json(
        dir.path(),
        &["habit", "edit", id, "--name", "Running 5K", "--frequency", "weekly", "--days", "3,6"],
    );
    assert_eq!(edited["name"], "Running 5K");
    assert_eq!(edited["frequency"], "weekly");
    assert_eq!(edited["frequency_days"], serde_json::json!([3, 6]));

    let monday = run_json(dir.path(), &["--date", "2026-01-05", "habit", "due"]);
    assert!(monday.as_array().unwrap().is_empty());
    let wednesday = run_json(dir.path(), &["--date", "2026-01-07", "habit", "due"]);
    assert_eq!(wednesday.as_array().unwrap().len(), 1);

    let (_, stderr, code) = run_cli(dir.path(), &["habit", "edit", "missing", "--name", "X"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_local_signout_persists() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["auth", "signout"]);
    assert_eq!(run_ok(dir.path(), &["auth", "status"]).trim(), "not signed in");

    let (_, stderr, code) = run_cli(dir.path(), &["habit", "add", "Leer"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("sign in"), "unexpected stderr: {stderr}");

    run_ok(dir.path(), &["auth", "signin", "--email", "tu@email.com", "--password", "abcd"]);
    run_ok(dir.path(), &["habit", "add", "Leer"]);
}

#[test]
fn test_month_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let habit = run_json(dir.path(), &["habit", "add", "Lectura diaria"]);
    let id = habit["id"].as_str().unwrap();
    run_ok(dir.path(), &["--date", "2026-02-01", "habit", "check", id]);

    let february = run_json(dir.path(), &["stats", "month", "--of", "2026-02"]);
    let days = february.as_array().unwrap();
    assert_eq!(days.len(), 28);
    assert_eq!(days[0]["date"], "2026-02-01");
    assert_eq!(days[0]["completed_habits"], 1);

    let january = run_json(dir.path(), &["--date", "2026-01-15", "stats", "month"]);
    assert_eq!(january.as_array().unwrap().len(), 31);

    let (_, _, code) = run_cli(dir.path(), &["stats", "month", "--of", "2026-13"]);
    assert_ne!(code, 0);
}
