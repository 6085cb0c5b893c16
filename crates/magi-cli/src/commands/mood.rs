use chrono::NaiveDate;
use clap::Subcommand;
use magi_core::model::MoodLog;
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Log today's mood (replaces an earlier log for the same day)
    Log {
        /// Mood score, 1-10
        score: u8,
        /// Energy level, 1-10
        #[arg(long)]
        energy: Option<u8>,
        /// Stress level, 1-10
        #[arg(long)]
        stress: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
        /// Date of the log (default: today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// List mood logs, newest first
    List,
    /// Averages over the last week
    Summary,
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: MoodAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MoodAction::Log {
            score,
            energy,
            stress,
            notes,
            on,
        } => {
            let mut log = MoodLog::new(on.unwrap_or(today), score, energy, stress)?;
            log.notes = notes;
            let log = tracker.log_mood(log)?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        MoodAction::List => {
            let mut logs = tracker.state()?.moods.clone();
            logs.sort_by(|a, b| b.date.cmp(&a.date));
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
        MoodAction::Summary => {
            let summary = tracker.mood_summary(today)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
