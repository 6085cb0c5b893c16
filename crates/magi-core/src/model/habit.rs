//! Habits and their completion records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, new_id};
use crate::error::ValidationError;

/// Cosmetic grouping of habits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Reading,
    Exercise,
    Health,
    Productivity,
    Learning,
    #[default]
    Personal,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 6] = [
        HabitCategory::Reading,
        HabitCategory::Exercise,
        HabitCategory::Health,
        HabitCategory::Productivity,
        HabitCategory::Learning,
        HabitCategory::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Reading => "reading",
            HabitCategory::Exercise => "exercise",
            HabitCategory::Health => "health",
            HabitCategory::Productivity => "productivity",
            HabitCategory::Learning => "learning",
            HabitCategory::Personal => "personal",
        }
    }
}

impl FromStr for HabitCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HabitCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown habit category '{s}'"),
            })
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred moment of the day. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Anytime,
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            "anytime" => Ok(TimeOfDay::Anytime),
            other => Err(ValidationError::InvalidValue {
                field: "time_of_day".into(),
                message: format!("unknown time of day '{other}'"),
            }),
        }
    }
}

/// Schedule classification as persisted (`frequency` column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(ValidationError::InvalidValue {
                field: "frequency".into(),
                message: format!("unknown frequency '{other}'"),
            }),
        }
    }
}

/// Weekday index of a date, 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// When a habit is considered due.
///
/// Persisted flat on the habit as `frequency` + `frequency_days`, which is
/// the column layout of the relational backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecurrenceRepr", into = "RecurrenceRepr")]
pub enum Recurrence {
    /// Every calendar day.
    Daily,
    /// On the listed weekday indices (0 = Sunday). An empty set is never due.
    Weekly { days: BTreeSet<u8> },
    /// Once per month, on no particular day.
    Monthly,
}

#[derive(Serialize, Deserialize)]
struct RecurrenceRepr {
    #[serde(default)]
    frequency: Frequency,
    #[serde(default)]
    frequency_days: Vec<u8>,
}

impl From<RecurrenceRepr> for Recurrence {
    fn from(repr: RecurrenceRepr) -> Self {
        match repr.frequency {
            Frequency::Daily => Recurrence::Daily,
            Frequency::Monthly => Recurrence::Monthly,
            // Out-of-range indices can only come from hand-edited data; drop them.
            Frequency::Weekly => Recurrence::Weekly {
                days: repr.frequency_days.into_iter().filter(|d| *d <= 6).collect(),
            },
        }
    }
}

impl From<Recurrence> for RecurrenceRepr {
    fn from(recurrence: Recurrence) -> Self {
        let frequency = recurrence.frequency();
        let frequency_days = match recurrence {
            Recurrence::Weekly { days } => days.into_iter().collect(),
            Recurrence::Daily | Recurrence::Monthly => Vec::new(),
        };
        RecurrenceRepr {
            frequency,
            frequency_days,
        }
    }
}

impl Recurrence {
    /// Build a weekly rule, rejecting indices outside 0..=6.
    pub fn weekly<I>(days: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut set = BTreeSet::new();
        for day in days {
            if day > 6 {
                return Err(ValidationError::InvalidWeekday(day));
            }
            set.insert(day);
        }
        Ok(Recurrence::Weekly { days: set })
    }

    /// Build a rule from its persisted parts.
    pub fn from_parts(frequency: Frequency, days: &[u8]) -> Result<Self, ValidationError> {
        match frequency {
            Frequency::Daily => Ok(Recurrence::Daily),
            Frequency::Monthly => Ok(Recurrence::Monthly),
            Frequency::Weekly => Recurrence::weekly(days.iter().copied()),
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Recurrence::Daily => Frequency::Daily,
            Recurrence::Weekly { .. } => Frequency::Weekly,
            Recurrence::Monthly => Frequency::Monthly,
        }
    }

    /// Target weekdays; empty unless weekly.
    pub fn days(&self) -> Vec<u8> {
        match self {
            Recurrence::Weekly { days } => days.iter().copied().collect(),
            Recurrence::Daily | Recurrence::Monthly => Vec::new(),
        }
    }

    /// Whether the rule itself selects `date`, ignoring the active flag.
    pub fn selects(&self, date: NaiveDate) -> bool {
        match self {
            Recurrence::Daily | Recurrence::Monthly => true,
            Recurrence::Weekly { days } => days.contains(&weekday_index(date)),
        }
    }
}

/// A trackable habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: HabitCategory,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create an active habit with a fresh id.
    pub fn new(
        name: impl Into<String>,
        category: HabitCategory,
        recurrence: Recurrence,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("name"));
        }
        Ok(Self {
            id: new_id(),
            name,
            category,
            recurrence,
            time_of_day: TimeOfDay::default(),
            active: true,
            notes: None,
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("name"));
        }
        self.name = name;
        Ok(())
    }

    pub fn is_daily(&self) -> bool {
        matches!(self.recurrence, Recurrence::Daily)
    }
}

/// "Habit was done on this date." Unique per (habit, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    #[serde(default = "default_true")]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Completion {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            habit_id: habit_id.into(),
            date,
            completed: true,
            notes: None,
        }
    }
}
