//! Exercise program: phases, the exercise catalog and workout logs.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Legs,
    Push,
    Pull,
    Core,
    Cardio,
}

impl FromStr for ExerciseCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legs" => Ok(ExerciseCategory::Legs),
            "push" => Ok(ExerciseCategory::Push),
            "pull" => Ok(ExerciseCategory::Pull),
            "core" => Ok(ExerciseCategory::Core),
            "cardio" => Ok(ExerciseCategory::Cardio),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown exercise category '{other}'"),
            }),
        }
    }
}

/// A named contiguous date range of the annual exercise plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePhase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phase_number: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ExercisePhase {
    pub fn new(
        name: impl Into<String>,
        phase_number: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("name"));
        }
        if end_date < start_date {
            return Err(ValidationError::InvalidValue {
                field: "end_date".into(),
                message: format!("{end_date} is before start date {start_date}"),
            });
        }
        Ok(Self {
            id: new_id(),
            name,
            description: None,
            phase_number: Some(phase_number),
            start_date: Some(start_date),
            end_date: Some(end_date),
        })
    }
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<ExerciseCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_muscles: Vec<String>,
}

/// One logged training entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub phase_id: Option<String>,
    #[serde(default)]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub exercise_name: Option<String>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Rate of perceived exertion, 1..=10.
    #[serde(default)]
    pub rpe: Option<u8>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkoutLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            date,
            phase_id: None,
            exercise_id: None,
            exercise_name: None,
            sets: None,
            reps: None,
            weight: None,
            rpe: None,
            duration_minutes: None,
            distance_km: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(rpe) = self.rpe {
            if !(1..=10).contains(&rpe) {
                return Err(ValidationError::OutOfRange {
                    field: "rpe",
                    min: 1,
                    max: 10,
                    value: i64::from(rpe),
                });
            }
        }
        if self.exercise_id.is_none() && self.exercise_name.is_none() {
            return Err(ValidationError::Empty("exercise"));
        }
        Ok(())
    }
}
