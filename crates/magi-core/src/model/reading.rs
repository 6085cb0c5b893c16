//! Reading plan entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::error::ValidationError;

/// One book of the reading plan (or an extra book outside the plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    /// Plan week, 1..=52. `None` for extra books.
    #[serde(default)]
    pub week: Option<u32>,
    /// Name of the reading block this week belongs to.
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_page: u32,
    /// 1..=5 stars.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_extra: bool,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::Empty("title"));
        }
        Ok(Self {
            id: new_id(),
            title,
            author: None,
            pages: None,
            week: None,
            block: None,
            start_date: None,
            end_date: None,
            completed: false,
            completed_date: None,
            current_page: 0,
            rating: None,
            notes: None,
            is_extra: false,
        })
    }

    /// Place the book in the plan for the given week and date window.
    pub fn scheduled(
        mut self,
        week: u32,
        block: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if !(1..=52).contains(&week) {
            return Err(ValidationError::OutOfRange {
                field: "week",
                min: 1,
                max: 52,
                value: i64::from(week),
            });
        }
        if end_date < start_date {
            return Err(ValidationError::InvalidValue {
                field: "end_date".into(),
                message: format!("{end_date} is before start date {start_date}"),
            });
        }
        self.week = Some(week);
        self.block = Some(block.into());
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        Ok(self)
    }

    /// Flip the completed flag, stamping or clearing the completion date.
    pub fn toggle_completed(&mut self, today: NaiveDate) {
        self.completed = !self.completed;
        self.completed_date = self.completed.then_some(today);
    }

    pub fn set_rating(&mut self, rating: Option<u8>) -> Result<(), ValidationError> {
        if let Some(stars) = rating {
            if !(1..=5).contains(&stars) {
                return Err(ValidationError::OutOfRange {
                    field: "rating",
                    min: 1,
                    max: 5,
                    value: i64::from(stars),
                });
            }
        }
        self.rating = rating;
        Ok(())
    }
}
