//! Collections, records and their natural keys.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
    AppState, Book, Completion, Exercise, ExercisePhase, Goal, Habit, Milestone, MonthlyTracking,
    MoodLog, WorkoutLog,
};

/// One persisted entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Habits,
    Completions,
    Books,
    Exercises,
    Phases,
    Workouts,
    Goals,
    Milestones,
    MonthlyTracking,
    Moods,
}

impl Collection {
    pub const ALL: [Collection; 10] = [
        Collection::Habits,
        Collection::Completions,
        Collection::Books,
        Collection::Exercises,
        Collection::Phases,
        Collection::Workouts,
        Collection::Goals,
        Collection::Milestones,
        Collection::MonthlyTracking,
        Collection::Moods,
    ];

    /// Table name on the relational backends.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Habits => "habits",
            Collection::Completions => "habit_checkins",
            Collection::Books => "books",
            Collection::Exercises => "exercises",
            Collection::Phases => "exercise_phases",
            Collection::Workouts => "workout_logs",
            Collection::Goals => "goals",
            Collection::Milestones => "goal_milestones",
            Collection::MonthlyTracking => "goal_monthly_tracking",
            Collection::Moods => "mood_logs",
        }
    }

    /// Columns of the upsert uniqueness constraint, owner column included.
    pub fn conflict_columns(self) -> Option<&'static str> {
        match self {
            Collection::Completions => Some("habit_id,date"),
            Collection::MonthlyTracking => Some("goal_id,month"),
            Collection::Moods => Some("user_id,date"),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Field values identifying a record independently of its id.
///
/// Always evaluated within one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey(Vec<(&'static str, String)>);

impl NaturalKey {
    pub fn new(fields: Vec<(&'static str, String)>) -> Self {
        Self(fields)
    }

    pub fn completion(habit_id: &str, date: chrono::NaiveDate) -> Self {
        Self::new(vec![("habit_id", habit_id.to_string()), ("date", date.to_string())])
    }

    pub fn monthly(goal_id: &str, month: u32) -> Self {
        Self::new(vec![("goal_id", goal_id.to_string()), ("month", month.to_string())])
    }

    pub fn mood(date: chrono::NaiveDate) -> Self {
        Self::new(vec![("date", date.to_string())])
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(value)?;
        }
        Ok(())
    }
}

/// A persisted entity.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Upsert key, for collections that declare one.
    fn natural_key(&self) -> Option<NaturalKey>;

    fn rows(state: &AppState) -> &Vec<Self>;

    fn rows_mut(state: &mut AppState) -> &mut Vec<Self>;
}

macro_rules! record {
    ($ty:ty => $collection:ident, $rows:ident) => {
        record!($ty => $collection, $rows, |_r| None);
    };
    ($ty:ty => $collection:ident, $rows:ident, |$r:ident| $key:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = Collection::$collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn natural_key(&self) -> Option<NaturalKey> {
                let $r = self;
                $key
            }

            fn rows(state: &AppState) -> &Vec<Self> {
                &state.$rows
            }

            fn rows_mut(state: &mut AppState) -> &mut Vec<Self> {
                &mut state.$rows
            }
        }
    };
}

record!(Habit => Habits, habits);
record!(Completion => Completions, completions, |r| Some(NaturalKey::completion(&r.habit_id, r.date)));
record!(Book => Books, books);
record!(Exercise => Exercises, exercises);
record!(ExercisePhase => Phases, phases);
record!(WorkoutLog => Workouts, workouts);
record!(Goal => Goals, goals);
record!(Milestone => Milestones, milestones);
record!(MonthlyTracking => MonthlyTracking, monthly_tracking, |r| Some(NaturalKey::monthly(&r.goal_id, r.month)));
record!(MoodLog => Moods, moods, |r| Some(NaturalKey::mood(r.date)));
