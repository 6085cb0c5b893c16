use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completion of daily habits today
    Today,
    /// Completion over the Sunday-to-Saturday week
    Week {
        /// Any date within the week (default: today)
        #[arg(long)]
        of: Option<NaiveDate>,
    },
    /// Streaks per active habit
    Streaks,
    /// Completed habits and scheduled book for every day of a month
    Month {
        /// Month as YYYY-MM (default: the current month)
        #[arg(long, value_parser = parse_month)]
        of: Option<NaiveDate>,
    },
}

/// First day of a `YYYY-MM` month.
fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got '{raw}'"))
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: StatsAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StatsAction::Today => {
            let stats = tracker.today_completion(today)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week { of } => {
            let stats = tracker.weekly_completion(of.unwrap_or(today))?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Streaks => {
            let report = tracker.habit_report(today)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Month { of } => {
            let month = of.unwrap_or(today);
            let days = tracker.month_calendar(month.year(), month.month())?;
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(())
}
