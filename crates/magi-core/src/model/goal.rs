//! Annual goals with milestones and per-month tracking.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Principal,
    #[default]
    General,
}

impl FromStr for GoalCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "principal" => Ok(GoalCategory::Principal),
            "general" => Ok(GoalCategory::General),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown goal category '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl GoalStatus {
    /// 100 is completed, anything above zero is in progress.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            100.. => GoalStatus::Completed,
            1..=99 => GoalStatus::InProgress,
            0 => GoalStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub status: GoalStatus,
    /// Percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub has_monthly_tracking: bool,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Goal {
    pub fn new(title: impl Into<String>, category: GoalCategory) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::Empty("title"));
        }
        Ok(Self {
            id: new_id(),
            title,
            description: None,
            category,
            status: GoalStatus::NotStarted,
            progress: 0,
            has_monthly_tracking: false,
            completed_date: None,
            notes: None,
            due_date: None,
        })
    }

    /// Set progress and derive the status from it.
    pub fn set_progress(&mut self, progress: u8, today: NaiveDate) -> Result<(), ValidationError> {
        if progress > 100 {
            return Err(ValidationError::OutOfRange {
                field: "progress",
                min: 0,
                max: 100,
                value: i64::from(progress),
            });
        }
        self.progress = progress;
        self.status = GoalStatus::from_progress(progress);
        self.completed_date = match self.status {
            GoalStatus::Completed => self.completed_date.or(Some(today)),
            _ => None,
        };
        Ok(())
    }

    /// Recompute progress from this goal's milestones.
    ///
    /// A goal without milestones keeps its manually set progress.
    pub fn sync_with_milestones(&mut self, milestones: &[Milestone], today: NaiveDate) {
        let own: Vec<&Milestone> = milestones.iter().filter(|m| m.goal_id == self.id).collect();
        if own.is_empty() {
            return;
        }
        let done = own.iter().filter(|m| m.completed).count();
        let progress = (done as f64 / own.len() as f64 * 100.0).round() as u8;
        // Always within 0..=100 here.
        let _ = self.set_progress(progress, today);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

impl Milestone {
    pub fn new(goal_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            goal_id: goal_id.into(),
            title: title.into(),
            completed: false,
            completed_date: None,
        }
    }

    pub fn toggle(&mut self, today: NaiveDate) {
        self.completed = !self.completed;
        self.completed_date = self.completed.then_some(today);
    }
}

/// One month's entry for goals tracked month by month. Unique per (goal, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTracking {
    pub id: String,
    pub goal_id: String,
    /// 1 = January .. 12 = December.
    pub month: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MonthlyTracking {
    pub fn new(goal_id: impl Into<String>, month: u32, completed: bool) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month",
                min: 1,
                max: 12,
                value: i64::from(month),
            });
        }
        Ok(Self {
            id: new_id(),
            goal_id: goal_id.into(),
            month,
            completed,
            value: None,
            notes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        "2026-03-01".parse().unwrap()
    }

    #[test]
    fn status_follows_progress() {
        assert_eq!(GoalStatus::from_progress(0), GoalStatus::NotStarted);
        assert_eq!(GoalStatus::from_progress(40), GoalStatus::InProgress);
        assert_eq!(GoalStatus::from_progress(100), GoalStatus::Completed);
    }

    #[test]
    fn progress_over_100_rejected() {
        let mut goal = Goal::new("Italiano nivel B2", GoalCategory::Principal).unwrap();
        assert!(goal.set_progress(101, today()).is_err());
        assert_eq!(goal.progress, 0);
    }

    #[test]
    fn milestones_drive_progress() {
        let mut goal = Goal::new("Maratón personal", GoalCategory::Principal).unwrap();
        let mut ms: Vec<Milestone> = ["5K", "10K", "21K"]
            .into_iter()
            .map(|t| Milestone::new(goal.id.clone(), t))
            .collect();
        ms.push(Milestone::new("other-goal", "unrelated"));
        ms[0].toggle(today());

        goal.sync_with_milestones(&ms, today());
        assert_eq!(goal.progress, 33);
        assert_eq!(goal.status, GoalStatus::InProgress);

        ms[1].toggle(today());
        ms[2].toggle(today());
        goal.sync_with_milestones(&ms, today());
        assert_eq!(goal.progress, 100);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_date, Some(today()));
    }

    #[test]
    fn goal_without_milestones_keeps_progress() {
        let mut goal = Goal::new("Aprender a coser", GoalCategory::General).unwrap();
        goal.set_progress(60, today()).unwrap();
        goal.sync_with_milestones(&[], today());
        assert_eq!(goal.progress, 60);
    }

    #[test]
    fn month_must_be_valid() {
        assert!(MonthlyTracking::new("g10", 0, true).is_err());
        assert!(MonthlyTracking::new("g10", 13, true).is_err());
        assert!(MonthlyTracking::new("g10", 12, true).is_ok());
    }
}
