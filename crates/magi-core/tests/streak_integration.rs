//! Integration tests for the schedule and streak engine over a realistic
//! week of check-ins.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use magi_core::engine::{
    best_current_streak, compute_streak, due_on, habit_report, today_completion,
    weekly_completion, CompletionLog,
};
use magi_core::model::{Completion, Habit, HabitCategory, Recurrence};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn habit(id: &str, recurrence: Recurrence) -> Habit {
    let mut h = Habit::new(id, HabitCategory::Personal, recurrence).unwrap();
    h.id = id.to_string();
    h
}

fn plan() -> Vec<Habit> {
    vec![
        habit("lectura", Recurrence::Daily),
        habit("fuerza", Recurrence::weekly([1, 2, 4, 5]).unwrap()),
        habit("running", Recurrence::weekly([3, 6]).unwrap()),
        habit("finanzas", Recurrence::Monthly),
        habit("descanso", Recurrence::weekly([0]).unwrap()),
    ]
}

#[test]
fn test_lectura_diaria_scenario() {
    let dates: BTreeSet<NaiveDate> = ["2026-01-05", "2026-01-06", "2026-01-07"]
        .into_iter()
        .map(date)
        .collect();
    assert_eq!(compute_streak(&dates, date("2026-01-07")), 3);
    // Still alive the next morning before checking in.
    assert_eq!(compute_streak(&dates, date("2026-01-08")), 3);
    // Gone once a full day is missed.
    assert_eq!(compute_streak(&dates, date("2026-01-09")), 0);
}

#[test]
fn test_due_list_for_a_wednesday() {
    let habits = plan();
    let due: Vec<&str> = due_on(&habits, date("2026-01-07"))
        .into_iter()
        .map(|h| h.id.as_str())
        .collect();
    assert_eq!(due, vec!["lectura", "running", "finanzas"]);
}

#[test]
fn test_full_week_aggregate() {
    let habits = plan();
    let completions: Vec<Completion> = [
        ("lectura", "2026-01-04"),
        ("lectura", "2026-01-05"),
        ("lectura", "2026-01-06"),
        ("fuerza", "2026-01-05"),
        ("fuerza", "2026-01-06"),
        ("running", "2026-01-07"),
        ("descanso", "2026-01-04"),
        ("finanzas", "2026-01-05"),
    ]
    .into_iter()
    .map(|(id, d)| Completion::new(id, date(d)))
    .collect();
    let log = CompletionLog::from_completions(&completions);

    // lectura 7 + fuerza 4 + running 2 + descanso 1; finanzas never counts.
    let week = weekly_completion(&habits, &log, date("2026-01-07"));
    assert_eq!(week.total, 14);
    assert_eq!(week.completed, 7);

    let today = today_completion(&habits, &log, date("2026-01-06"));
    assert_eq!((today.completed, today.total, today.percentage), (1, 1, 100));

    assert_eq!(best_current_streak(&habits, &log, date("2026-01-06"), 365), 3);

    let report = habit_report(&habits, &log, date("2026-01-07"), 365);
    let lectura = report.iter().find(|r| r.habit_id == "lectura").unwrap();
    assert!(lectura.due_today);
    assert!(!lectura.done_today);
    assert_eq!(lectura.current_streak, 3);
    assert_eq!(lectura.longest_streak, 3);
}

#[test]
fn test_inactive_habits_drop_out_everywhere() {
    let mut habits = plan();
    for h in habits.iter_mut() {
        h.active = false;
    }
    let log = CompletionLog::from_completions(&[Completion::new("lectura", date("2026-01-07"))]);
    assert!(due_on(&habits, date("2026-01-07")).is_empty());
    assert_eq!(today_completion(&habits, &log, date("2026-01-07")).total, 0);
    assert_eq!(weekly_completion(&habits, &log, date("2026-01-07")).total, 0);
    assert_eq!(best_current_streak(&habits, &log, date("2026-01-07"), 365), 0);
}
