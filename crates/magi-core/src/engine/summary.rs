//! Read-only views derived from a state snapshot.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use super::completion::{today_completion, weekly_completion, CompletionLog, DailyCompletion, WeeklyCompletion};
use super::current::{current_by_date_range, DateWindow};
use super::schedule::is_due;
use super::streak::{best_current_streak, compute_streak_within, longest_streak};
use crate::model::{AppState, Book, ExercisePhase, GoalCategory, GoalStatus, Habit, MoodLog};

/// Per-habit line of the habits report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub due_today: bool,
    pub done_today: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Status of every active habit, in list order.
pub fn habit_report(
    habits: &[Habit],
    log: &CompletionLog,
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<HabitStatus> {
    habits
        .iter()
        .filter(|h| h.active)
        .map(|h| {
            let dates = log.dates(&h.id);
            HabitStatus {
                habit_id: h.id.clone(),
                name: h.name.clone(),
                due_today: is_due(h, today),
                done_today: dates.contains(&today),
                current_streak: compute_streak_within(dates, today, horizon_days),
                longest_streak: longest_streak(dates),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockProgress {
    pub name: String,
    pub first_week: u32,
    pub last_week: u32,
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingSummary {
    pub completed: u32,
    pub total: u32,
    pub total_pages: u32,
    pub pages_read: u32,
    /// Books rated 4 stars or more.
    pub highly_rated: u32,
    pub blocks: Vec<BlockProgress>,
}

pub fn reading_summary(books: &[Book]) -> ReadingSummary {
    let completed = books.iter().filter(|b| b.completed).count() as u32;
    let total_pages = books.iter().filter_map(|b| b.pages).sum();
    let pages_read = books
        .iter()
        .filter(|b| b.completed)
        .filter_map(|b| b.pages)
        .sum();
    let highly_rated = books
        .iter()
        .filter(|b| b.rating.unwrap_or(0) >= 4)
        .count() as u32;

    ReadingSummary {
        completed,
        total: books.len() as u32,
        total_pages,
        pages_read,
        highly_rated,
        blocks: block_progress(books),
    }
}

/// Group planned books by block name, in week order.
pub fn block_progress(books: &[Book]) -> Vec<BlockProgress> {
    let mut planned: Vec<(u32, &str, bool)> = books
        .iter()
        .filter_map(|b| Some((b.week?, b.block.as_deref()?, b.completed)))
        .collect();
    planned.sort_by_key(|(week, _, _)| *week);

    let mut blocks: Vec<BlockProgress> = Vec::new();
    for (week, name, completed) in planned {
        let index = match blocks.iter().position(|b| b.name == name) {
            Some(index) => index,
            None => {
                blocks.push(BlockProgress {
                    name: name.to_string(),
                    first_week: week,
                    last_week: week,
                    completed: 0,
                    total: 0,
                });
                blocks.len() - 1
            }
        };
        let block = &mut blocks[index];
        block.last_week = block.last_week.max(week);
        block.total += 1;
        if completed {
            block.completed += 1;
        }
    }
    blocks
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    pub logs: u32,
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
    pub average_stress: Option<f64>,
}

fn average(values: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = values.fold((0u32, 0u32), |(s, c), v| (s + u32::from(v), c + 1));
    if count == 0 {
        return None;
    }
    Some((f64::from(sum) / f64::from(count) * 10.0).round() / 10.0)
}

/// Averages over logs dated from `today - 7` through `today`.
pub fn mood_summary(logs: &[MoodLog], today: NaiveDate) -> MoodSummary {
    let since = today.checked_sub_days(Days::new(7)).unwrap_or(today);
    let recent: Vec<&MoodLog> = logs
        .iter()
        .filter(|m| since <= m.date && m.date <= today)
        .collect();

    MoodSummary {
        logs: recent.len() as u32,
        average_mood: average(recent.iter().map(|m| m.mood_score)),
        average_energy: average(recent.iter().filter_map(|m| m.energy_level)),
        average_stress: average(recent.iter().filter_map(|m| m.stress_level)),
    }
}

/// Share of `today`'s calendar year already elapsed, 0..=100, `today` included.
pub fn year_progress(today: NaiveDate) -> f64 {
    let days_in_year = if NaiveDate::from_ymd_opt(today.year(), 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    (f64::from(today.ordinal()) / days_in_year * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentBook {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub week: Option<u32>,
}

impl From<&Book> for CurrentBook {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            week: book.week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPhase {
    pub id: String,
    pub name: String,
    pub phase_number: Option<u32>,
}

impl From<&ExercisePhase> for CurrentPhase {
    fn from(phase: &ExercisePhase) -> Self {
        Self {
            id: phase.id.clone(),
            name: phase.name.clone(),
            phase_number: phase.phase_number,
        }
    }
}

/// One cell of the month calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Habits with a completion on this date, paused ones included.
    pub completed_habits: u32,
    pub book: Option<CurrentBook>,
}

/// Every day of `year`-`month` with its completions and scheduled book.
///
/// Empty for a month that does not exist.
pub fn month_calendar(state: &AppState, year: i32, month: u32) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let log = CompletionLog::from_completions(&state.completions);
    first
        .iter_days()
        .take_while(|day| day.month() == month)
        .map(|date| CalendarDay {
            date,
            completed_habits: state
                .habits
                .iter()
                .filter(|h| log.is_done(&h.id, date))
                .count() as u32,
            book: state
                .books
                .iter()
                .find(|b| b.contains(date))
                .map(CurrentBook::from),
        })
        .collect()
}

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub today: DailyCompletion,
    pub week: WeeklyCompletion,
    pub best_streak: u32,
    pub current_book: Option<CurrentBook>,
    pub current_phase: Option<CurrentPhase>,
    pub books_completed: u32,
    pub books_total: u32,
    pub principal_goals_completed: u32,
    pub principal_goals_in_progress: u32,
    pub principal_goals_total: u32,
    pub year_progress: f64,
}

pub fn dashboard(state: &AppState, today: NaiveDate, horizon_days: u32) -> Dashboard {
    let log = CompletionLog::from_completions(&state.completions);
    let principal: Vec<_> = state
        .goals
        .iter()
        .filter(|g| g.category == GoalCategory::Principal)
        .collect();
    let count_status = |status: GoalStatus| principal.iter().filter(|g| g.status == status).count() as u32;

    Dashboard {
        date: today,
        today: today_completion(&state.habits, &log, today),
        week: weekly_completion(&state.habits, &log, today),
        best_streak: best_current_streak(&state.habits, &log, today, horizon_days),
        current_book: current_by_date_range(&state.books, today).map(CurrentBook::from),
        current_phase: current_by_date_range(&state.phases, today).map(CurrentPhase::from),
        books_completed: state.books.iter().filter(|b| b.completed).count() as u32,
        books_total: state.books.len() as u32,
        principal_goals_completed: count_status(GoalStatus::Completed),
        principal_goals_in_progress: count_status(GoalStatus::InProgress),
        principal_goals_total: principal.len() as u32,
        year_progress: year_progress(today),
    }
}
