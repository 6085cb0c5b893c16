//! Habit commands.

use chrono::NaiveDate;
use clap::Subcommand;
use magi_core::engine::due_on;
use magi_core::model::{Frequency, Habit, HabitCategory, Recurrence, TimeOfDay};
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Add {
        /// Habit name
        name: String,
        /// reading, exercise, health, productivity, learning or personal
        #[arg(long, default_value = "personal")]
        category: HabitCategory,
        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        /// Comma-separated weekday indices for weekly habits (0 = Sunday)
        #[arg(long)]
        days: Option<String>,
        /// morning, afternoon, evening or anytime
        #[arg(long, default_value = "anytime")]
        time_of_day: TimeOfDay,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a habit's name, category, schedule or notes
    Edit {
        /// Habit ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<HabitCategory>,
        /// daily, weekly or monthly; weekly keeps the current days unless --days is given
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Comma-separated weekday indices (0 = Sunday)
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        time_of_day: Option<TimeOfDay>,
        /// New notes; an empty string clears them
        #[arg(long)]
        notes: Option<String>,
    },
    /// List habits
    List {
        /// Include inactive habits
        #[arg(long)]
        all: bool,
    },
    /// Habits due on a date
    Due,
    /// Toggle completion for a date
    Check {
        /// Habit ID
        id: String,
        /// Date to toggle (default: today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// Current streak of one habit
    Streak {
        /// Habit ID
        id: String,
    },
    /// Stop tracking a habit without deleting its history
    Pause {
        /// Habit ID
        id: String,
    },
    /// Resume a paused habit
    Resume {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its completions
    Delete {
        /// Habit ID
        id: String,
    },
}

fn parse_days(raw: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut days = Vec::new();
    for day in super::split_list(raw) {
        days.push(
            day.parse::<u8>()
                .map_err(|e| format!("invalid weekday '{day}': {e}"))?,
        );
    }
    Ok(days)
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: HabitAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HabitAction::Add {
            name,
            category,
            frequency,
            days,
            time_of_day,
            notes,
        } => {
            let days = days.as_deref().map(parse_days).transpose()?.unwrap_or_default();
            let recurrence = Recurrence::from_parts(frequency, &days)?;
            let mut habit = Habit::new(name, category, recurrence)?;
            habit.time_of_day = time_of_day;
            habit.notes = notes;
            let habit = tracker.add_habit(habit)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Edit {
            id,
            name,
            category,
            frequency,
            days,
            time_of_day,
            notes,
        } => {
            let mut habit = tracker.habit(&id)?;
            if let Some(name) = name {
                habit.rename(name)?;
            }
            if let Some(category) = category {
                habit.category = category;
            }
            if frequency.is_some() || days.is_some() {
                let frequency = frequency.unwrap_or_else(|| habit.recurrence.frequency());
                let days = match days.as_deref() {
                    Some(raw) => parse_days(raw)?,
                    None => habit.recurrence.days(),
                };
                habit.recurrence = Recurrence::from_parts(frequency, &days)?;
            }
            if let Some(time_of_day) = time_of_day {
                habit.time_of_day = time_of_day;
            }
            if let Some(notes) = notes {
                habit.notes = Some(notes).filter(|n| !n.trim().is_empty());
            }
            let habit = tracker.update_habit(habit)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { all } => {
            let habits: Vec<&Habit> = tracker
                .state()?
                .habits
                .iter()
                .filter(|h| all || h.active)
                .collect();
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Due => {
            let state = tracker.state()?;
            let due = due_on(&state.habits, today);
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        HabitAction::Check { id, on } => {
            let date = on.unwrap_or(today);
            let done = tracker.toggle_completion(&id, date)?;
            let streak = tracker.streak(&id, today)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "habit_id": id,
                    "date": date,
                    "completed": done,
                    "current_streak": streak,
                }))?
            );
        }
        HabitAction::Streak { id } => {
            println!("{}", tracker.streak(&id, today)?);
        }
        HabitAction::Pause { id } => {
            let habit = tracker.set_habit_active(&id, false)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Resume { id } => {
            let habit = tracker.set_habit_active(&id, true)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Delete { id } => {
            tracker.delete_habit(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
