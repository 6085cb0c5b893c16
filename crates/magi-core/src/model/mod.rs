//! Canonical schema shared by every storage backend.
//!
//! Every entity carries a stable string `id`. Owner scoping is a storage
//! concern and never appears on the entities themselves.

pub mod exercise;
pub mod goal;
pub mod habit;
pub mod mood;
pub mod reading;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use exercise::{Exercise, ExerciseCategory, ExercisePhase, WorkoutLog};
pub use goal::{Goal, GoalCategory, GoalStatus, Milestone, MonthlyTracking};
pub use habit::{weekday_index, Completion, Frequency, Habit, HabitCategory, Recurrence, TimeOfDay};
pub use mood::MoodLog;
pub use reading::Book;

/// Fresh record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

/// Full state tree: one vector per collection.
///
/// This is both the cached read snapshot of the tracker and the blob stored
/// by the local snapshot backend. Missing collections default to empty so
/// older snapshots keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub habits: Vec<Habit>,
    pub completions: Vec<Completion>,
    pub books: Vec<Book>,
    pub exercises: Vec<Exercise>,
    pub phases: Vec<ExercisePhase>,
    pub workouts: Vec<WorkoutLog>,
    pub goals: Vec<Goal>,
    pub milestones: Vec<Milestone>,
    pub monthly_tracking: Vec<MonthlyTracking>,
    pub moods: Vec<MoodLog>,
}

impl AppState {
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn milestone(&self, id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
            && self.completions.is_empty()
            && self.books.is_empty()
            && self.exercises.is_empty()
            && self.phases.is_empty()
            && self.workouts.is_empty()
            && self.goals.is_empty()
            && self.milestones.is_empty()
            && self.monthly_tracking.is_empty()
            && self.moods.is_empty()
    }
}
