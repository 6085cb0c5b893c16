//! Exercise program commands.

use chrono::NaiveDate;
use clap::Subcommand;
use magi_core::model::{new_id, Exercise, ExerciseCategory, ExercisePhase, WorkoutLog};
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum ExerciseAction {
    /// Add an exercise to the catalog
    Add {
        name: String,
        /// legs, push, pull, core or cardio
        #[arg(long)]
        category: Option<ExerciseCategory>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated muscle groups
        #[arg(long)]
        muscles: Option<String>,
    },
    /// List the exercise catalog
    List,
    /// Add a phase to the program
    Phase {
        name: String,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        description: Option<String>,
    },
    /// List program phases
    Phases,
    /// The phase covering today, or the next one
    Current,
    /// Log a training entry
    Log {
        /// Catalog exercise ID
        #[arg(long, required_unless_present = "name")]
        exercise: Option<String>,
        /// Free-form exercise name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        sets: Option<u32>,
        #[arg(long)]
        reps: Option<u32>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Rate of perceived exertion, 1-10
        #[arg(long)]
        rpe: Option<u8>,
        /// Duration in minutes
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        km: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// Date of the workout (default: today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// List workout logs, newest first
    Workouts,
    /// Delete a workout log
    Unlog {
        /// Workout log ID
        id: String,
    },
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: ExerciseAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ExerciseAction::Add {
            name,
            category,
            description,
            muscles,
        } => {
            if name.trim().is_empty() {
                return Err("exercise name must not be empty".into());
            }
            let exercise = tracker.add_exercise(Exercise {
                id: new_id(),
                name,
                category,
                description,
                target_muscles: muscles.as_deref().map(super::split_list).unwrap_or_default(),
            })?;
            println!("{}", serde_json::to_string_pretty(&exercise)?);
        }
        ExerciseAction::List => {
            println!("{}", serde_json::to_string_pretty(&tracker.state()?.exercises)?);
        }
        ExerciseAction::Phase {
            name,
            number,
            start,
            end,
            description,
        } => {
            let mut phase = ExercisePhase::new(name, number, start, end)?;
            phase.description = description;
            let phase = tracker.add_phase(phase)?;
            println!("{}", serde_json::to_string_pretty(&phase)?);
        }
        ExerciseAction::Phases => {
            let mut phases = tracker.state()?.phases.clone();
            phases.sort_by_key(|p| p.phase_number);
            println!("{}", serde_json::to_string_pretty(&phases)?);
        }
        ExerciseAction::Current => {
            let current = tracker.current_phase(today)?;
            println!("{}", serde_json::to_string_pretty(&current)?);
        }
        ExerciseAction::Log {
            exercise,
            name,
            phase,
            sets,
            reps,
            weight,
            rpe,
            minutes,
            km,
            notes,
            on,
        } => {
            let mut log = WorkoutLog::new(on.unwrap_or(today));
            log.exercise_id = exercise;
            log.exercise_name = name;
            log.phase_id = phase;
            log.sets = sets;
            log.reps = reps;
            log.weight = weight;
            log.rpe = rpe;
            log.duration_minutes = minutes;
            log.distance_km = km;
            log.notes = notes;
            let log = tracker.log_workout(log)?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        ExerciseAction::Workouts => {
            let mut logs = tracker.state()?.workouts.clone();
            logs.sort_by(|a, b| b.date.cmp(&a.date));
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
        ExerciseAction::Unlog { id } => {
            tracker.delete_workout(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
