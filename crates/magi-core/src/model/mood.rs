//! Daily mood, energy and stress logs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::error::ValidationError;

/// One log per day; a second log for the same date replaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: String,
    pub date: NaiveDate,
    /// 1..=10.
    pub mood_score: u8,
    #[serde(default)]
    pub energy_level: Option<u8>,
    #[serde(default)]
    pub stress_level: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn check_scale(field: &'static str, value: u8) -> Result<u8, ValidationError> {
    if (1..=10).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: 1,
            max: 10,
            value: i64::from(value),
        })
    }
}

impl MoodLog {
    pub fn new(
        date: NaiveDate,
        mood_score: u8,
        energy_level: Option<u8>,
        stress_level: Option<u8>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_id(),
            date,
            mood_score: check_scale("mood_score", mood_score)?,
            energy_level: energy_level
                .map(|v| check_scale("energy_level", v))
                .transpose()?,
            stress_level: stress_level
                .map(|v| check_scale("stress_level", v))
                .transpose()?,
            notes: None,
        })
    }
}
