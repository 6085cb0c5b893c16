//! Schedule and streak engine.
//!
//! Pure functions over a state snapshot and a reference date. Nothing here
//! touches storage or the clock.

pub mod completion;
pub mod current;
pub mod schedule;
pub mod streak;
pub mod summary;

pub use completion::{
    today_completion, week_start, weekly_completion, CompletionLog, DailyCompletion,
    WeeklyCompletion,
};
pub use current::{current_by_date_range, DateWindow};
pub use schedule::{due_on, is_due};
pub use streak::{
    best_current_streak, compute_streak, compute_streak_within, longest_streak,
    DEFAULT_HORIZON_DAYS,
};
pub use summary::{
    block_progress, dashboard, habit_report, month_calendar, mood_summary, reading_summary,
    year_progress, BlockProgress, CalendarDay, CurrentBook, CurrentPhase, Dashboard,
    HabitStatus, MoodSummary, ReadingSummary,
};
