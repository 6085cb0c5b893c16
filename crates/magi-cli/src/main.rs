use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use magi_core::{Backend, Identity, Tracker};
use tracing_subscriber::EnvFilter;

mod commands;
mod session;

use session::Workspace;

#[derive(Parser)]
#[command(name = "magi", version, about = "MAGI personal life tracker")]
struct Cli {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Data(DataCommand),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions { shell: clap_complete::Shell },
}

/// Commands that read or change the signed-in user's data.
#[derive(Subcommand)]
enum DataCommand {
    /// Habits and daily check-ins
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Completion statistics and streaks
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Reading plan
    Reading {
        #[command(subcommand)]
        action: commands::reading::ReadingAction,
    },
    /// Exercise program and workout logs
    Exercise {
        #[command(subcommand)]
        action: commands::exercise::ExerciseAction,
    },
    /// Annual goals, milestones and monthly tracking
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Mood, energy and stress logs
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Overview of today
    Dashboard,
    /// Account management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Write a JSON backup of all data
    Export {
        /// Output file (default: magi-backup-YYYY-MM-DD.json)
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Replace all data with a JSON backup
    Import {
        /// Backup file
        path: std::path::PathBuf,
    },
    /// Populate an empty account from a TOML plan file
    Seed {
        /// Plan file
        plan: std::path::PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MAGI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    command: DataCommand,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        DataCommand::Habit { action } => commands::habit::run(tracker, action, today),
        DataCommand::Stats { action } => commands::stats::run(tracker, action, today),
        DataCommand::Reading { action } => commands::reading::run(tracker, action, today),
        DataCommand::Exercise { action } => commands::exercise::run(tracker, action, today),
        DataCommand::Goal { action } => commands::goal::run(tracker, action, today),
        DataCommand::Mood { action } => commands::mood::run(tracker, action, today),
        DataCommand::Dashboard => {
            let dashboard = tracker.dashboard(today)?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
        DataCommand::Auth { action } => commands::auth::run(tracker, action),
        DataCommand::Export { output } => commands::data::export(tracker, output),
        DataCommand::Import { path } => commands::data::import(tracker, &path),
        DataCommand::Seed { plan } => commands::data::seed(tracker, &plan, today),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let today = cli.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            clap_complete::generate(shell, &mut Cli::command(), "magi", &mut std::io::stdout());
            Ok(())
        }
        Commands::Data(command) => match session::open()? {
            Workspace::Local(mut tracker) => dispatch(&mut tracker, command, today),
            Workspace::Sqlite(mut tracker) => dispatch(&mut tracker, command, today),
            Workspace::Remote(mut tracker) => dispatch(&mut tracker, command, today),
        },
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
