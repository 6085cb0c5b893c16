//! First-run population from a plan file.
//!
//! A plan is a TOML document listing habits, books, goals (with their
//! milestones), exercise phases and catalog exercises. Seeding runs only when
//! the user has no habits yet. Records are inserted one by one with no
//! transaction, so a failure part way leaves a partially seeded state.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, CoreError, Result};
use crate::identity::Identity;
use crate::model::{
    new_id, Book, Exercise, ExerciseCategory, ExercisePhase, Frequency, Goal, GoalCategory,
    Habit, HabitCategory, Recurrence, TimeOfDay,
};
use crate::storage::Backend;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedPlan {
    pub habits: Vec<HabitSeed>,
    pub books: Vec<BookSeed>,
    pub goals: Vec<GoalSeed>,
    pub phases: Vec<PhaseSeed>,
    pub exercises: Vec<ExerciseSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabitSeed {
    pub name: String,
    #[serde(default)]
    pub category: HabitCategory,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub days: Vec<u8>,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookSeed {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    pub week: u32,
    pub block: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalSeed {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub monthly: bool,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhaseSeed {
    pub name: String,
    pub number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSeed {
    pub name: String,
    #[serde(default)]
    pub category: Option<ExerciseCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_muscles: Vec<String>,
}

impl SeedPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| {
            ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
            && self.books.is_empty()
            && self.goals.is_empty()
            && self.phases.is_empty()
            && self.exercises.is_empty()
    }
}

/// What a seeding run inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub seeded: bool,
    pub habits: usize,
    pub books: usize,
    pub goals: usize,
    pub milestones: usize,
    pub phases: usize,
    pub exercises: usize,
}

/// Insert `plan` unless the current user already has habits.
pub fn seed_if_empty<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    plan: &SeedPlan,
    today: NaiveDate,
) -> Result<SeedReport> {
    if tracker.current_user().is_none() {
        return Err(CoreError::NotSignedIn);
    }
    if !tracker.state()?.habits.is_empty() {
        info!("habits already present, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport {
        seeded: true,
        ..SeedReport::default()
    };

    for seed in &plan.habits {
        let recurrence = Recurrence::from_parts(seed.frequency, &seed.days)?;
        let mut habit = Habit::new(seed.name.as_str(), seed.category, recurrence)?;
        habit.time_of_day = seed.time_of_day;
        habit.notes = seed.notes.clone();
        tracker.add_habit(habit)?;
        report.habits += 1;
    }

    for seed in &plan.books {
        let mut book = Book::new(seed.title.as_str())?.scheduled(
            seed.week,
            seed.block.as_str(),
            seed.start_date,
            seed.end_date,
        )?;
        book.author = seed.author.clone();
        book.pages = seed.pages;
        book.notes = seed.notes.clone();
        tracker.add_book(book)?;
        report.books += 1;
    }

    for seed in &plan.goals {
        let mut goal = Goal::new(seed.title.as_str(), seed.category)?;
        goal.description = seed.description.clone();
        goal.has_monthly_tracking = seed.monthly;
        let goal = tracker.add_goal(goal)?;
        report.goals += 1;
        for title in &seed.milestones {
            tracker.add_milestone(&goal.id, title, today)?;
            report.milestones += 1;
        }
    }

    for seed in &plan.phases {
        let mut phase =
            ExercisePhase::new(seed.name.as_str(), seed.number, seed.start_date, seed.end_date)?;
        phase.description = seed.description.clone();
        tracker.add_phase(phase)?;
        report.phases += 1;
    }

    for seed in &plan.exercises {
        tracker.add_exercise(Exercise {
            id: new_id(),
            name: seed.name.clone(),
            category: seed.category,
            description: seed.description.clone(),
            target_muscles: seed.target_muscles.clone(),
        })?;
        report.exercises += 1;
    }

    info!(
        habits = report.habits,
        books = report.books,
        goals = report.goals,
        "seeded plan"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentity;
    use crate::storage::SnapshotStore;

    const PLAN: &str = r#"
[[habits]]
name = "Lectura diaria (30 min)"
category = "reading"
time_of_day = "evening"

[[habits]]
name = "Running"
category = "exercise"
frequency = "weekly"
days = [3, 6]

[[books]]
title = "La muerte de Iván Ilich"
author = "León Tolstói"
pages = 96
week = 2
block = "Reinicio del Hábito"
start_date = "2026-01-05"
end_date = "2026-01-11"

[[goals]]
title = "Usar MAGI activamente durante 2026"
category = "principal"
milestones = ["Configurar sistema MAGI", "Uso semanal consistente - Q1"]

[[phases]]
name = "Calistenia + Cargas"
number = 1
start_date = "2026-01-01"
end_date = "2026-03-31"

[[exercises]]
name = "Sentadilla"
category = "legs"
target_muscles = ["cuádriceps", "glúteos"]
"#;

    fn today() -> NaiveDate {
        "2026-01-01".parse().unwrap()
    }

    #[test]
    fn plan_parses_with_defaults() {
        let plan = SeedPlan::parse(PLAN).unwrap();
        assert_eq!(plan.habits.len(), 2);
        assert_eq!(plan.habits[0].frequency, Frequency::Daily);
        assert_eq!(plan.habits[1].days, vec![3, 6]);
        assert_eq!(plan.goals[0].milestones.len(), 2);
        assert!(SeedPlan::parse("").unwrap().is_empty());
    }

    #[test]
    fn malformed_plan_is_a_config_error() {
        assert!(matches!(
            SeedPlan::parse("[[habits]]\ncategory = \"reading\"\n"),
            Err(ConfigError::InvalidPlan(_))
        ));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toml");
        std::fs::write(&path, "habits = 3").unwrap();
        assert!(matches!(
            SeedPlan::load(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn demo_plan_seeds_cleanly() {
        let plan = SeedPlan::parse(include_str!("../../../demos/plan.toml")).unwrap();
        let mut tracker = Tracker::new(SnapshotStore::in_memory(), LocalIdentity::new());
        let report = seed_if_empty(&mut tracker, &plan, today()).unwrap();
        assert_eq!(report.habits, 8);
        assert_eq!(report.phases, 4);
        let week_two = tracker.current_book("2026-01-08".parse().unwrap()).unwrap();
        assert_eq!(week_two.unwrap().week, Some(2));
    }

    #[test]
    fn seeding_twice_inserts_once() {
        let plan = SeedPlan::parse(PLAN).unwrap();
        let mut tracker = Tracker::new(SnapshotStore::in_memory(), LocalIdentity::new());

        let first = seed_if_empty(&mut tracker, &plan, today()).unwrap();
        assert!(first.seeded);
        assert_eq!(first.milestones, 2);

        let second = seed_if_empty(&mut tracker, &plan, today()).unwrap();
        assert!(!second.seeded);

        let state = tracker.state().unwrap();
        assert_eq!(state.habits.len(), 2);
        assert_eq!(state.books.len(), 1);
        assert_eq!(state.milestones.len(), 2);
        assert_eq!(state.exercises.len(), 1);
    }

    #[test]
    fn bad_weekday_stops_part_way() {
        let plan = SeedPlan::parse(
            r#"
[[habits]]
name = "Leer"

[[habits]]
name = "Roto"
frequency = "weekly"
days = [9]
"#,
        )
        .unwrap();
        let mut tracker = Tracker::new(SnapshotStore::in_memory(), LocalIdentity::new());
        assert!(seed_if_empty(&mut tracker, &plan, today()).is_err());
        assert_eq!(tracker.state().unwrap().habits.len(), 1);
    }

    #[test]
    fn requires_a_user() {
        let plan = SeedPlan::parse(PLAN).unwrap();
        let mut tracker = Tracker::new(SnapshotStore::in_memory(), LocalIdentity::signed_out());
        assert!(matches!(
            seed_if_empty(&mut tracker, &plan, today()),
            Err(CoreError::NotSignedIn)
        ));
    }
}
