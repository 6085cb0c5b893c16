//! Daily and weekly completion aggregates.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::{weekday_index, Completion, Habit, Recurrence};

static NO_DATES: BTreeSet<NaiveDate> = BTreeSet::new();

/// Completed dates indexed by habit id.
///
/// Records flagged `completed = false` are ignored.
#[derive(Debug, Clone, Default)]
pub struct CompletionLog {
    by_habit: HashMap<String, BTreeSet<NaiveDate>>,
}

impl CompletionLog {
    pub fn from_completions(completions: &[Completion]) -> Self {
        completions.iter().collect()
    }

    pub fn dates(&self, habit_id: &str) -> &BTreeSet<NaiveDate> {
        self.by_habit.get(habit_id).unwrap_or(&NO_DATES)
    }

    pub fn is_done(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.dates(habit_id).contains(&date)
    }
}

impl<'a> FromIterator<&'a Completion> for CompletionLog {
    fn from_iter<T: IntoIterator<Item = &'a Completion>>(iter: T) -> Self {
        let mut by_habit: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        for completion in iter.into_iter().filter(|c| c.completed) {
            by_habit
                .entry(completion.habit_id.clone())
                .or_default()
                .insert(completion.date);
        }
        Self { by_habit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCompletion {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyCompletion {
    pub completed: u32,
    pub total: u32,
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(weekday_index(date)))
}

/// Completion of active daily habits on `today`.
pub fn today_completion(habits: &[Habit], log: &CompletionLog, today: NaiveDate) -> DailyCompletion {
    let daily: Vec<&Habit> = habits.iter().filter(|h| h.active && h.is_daily()).collect();
    let total = daily.len() as u32;
    let completed = daily.iter().filter(|h| log.is_done(&h.id, today)).count() as u32;
    let percentage = if total == 0 {
        0
    } else {
        (f64::from(completed) / f64::from(total) * 100.0).round() as u32
    };

    DailyCompletion {
        completed,
        total,
        percentage,
    }
}

/// Completion over the Sunday-to-Saturday week containing `week_of`.
///
/// Daily habits count every day, weekly habits only on their target days.
/// Monthly habits are left out.
pub fn weekly_completion(
    habits: &[Habit],
    log: &CompletionLog,
    week_of: NaiveDate,
) -> WeeklyCompletion {
    let start = week_start(week_of);
    let mut completed = 0;
    let mut total = 0;

    for offset in 0..7 {
        let day = start + Days::new(offset);
        for habit in habits.iter().filter(|h| h.active) {
            let counts = match &habit.recurrence {
                Recurrence::Daily => true,
                Recurrence::Weekly { .. } => habit.recurrence.selects(day),
                Recurrence::Monthly => false,
            };
            if !counts {
                continue;
            }
            total += 1;
            if log.is_done(&habit.id, day) {
                completed += 1;
            }
        }
    }

    WeeklyCompletion { completed, total }
}
