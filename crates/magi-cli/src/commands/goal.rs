//! Goal commands.

use chrono::NaiveDate;
use clap::Subcommand;
use magi_core::model::{Goal, GoalCategory};
use magi_core::{Backend, Identity, Tracker};
use serde::Serialize;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        title: String,
        /// principal or general
        #[arg(long, default_value = "general")]
        category: GoalCategory,
        #[arg(long)]
        description: Option<String>,
        /// Track this goal month by month
        #[arg(long)]
        monthly: bool,
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List goals with their milestones
    List,
    /// Set progress manually (0-100)
    Progress { id: String, percent: u8 },
    /// Add a milestone to a goal
    Milestone { goal_id: String, title: String },
    /// Toggle a milestone and recompute its goal
    Check {
        /// Milestone ID
        id: String,
    },
    /// Record one month of a monthly-tracked goal
    Month {
        goal_id: String,
        /// 1-12
        month: u32,
        #[arg(long)]
        done: bool,
        #[arg(long)]
        value: Option<String>,
    },
    /// Delete a goal with its milestones and monthly entries
    Delete { id: String },
}

#[derive(Serialize)]
struct GoalView<'a> {
    #[serde(flatten)]
    goal: &'a Goal,
    milestones: Vec<&'a magi_core::model::Milestone>,
    months: Vec<&'a magi_core::model::MonthlyTracking>,
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: GoalAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GoalAction::Add {
            title,
            category,
            description,
            monthly,
            due,
        } => {
            let mut goal = Goal::new(title, category)?;
            goal.description = description;
            goal.has_monthly_tracking = monthly;
            goal.due_date = due;
            let goal = tracker.add_goal(goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List => {
            let state = tracker.state()?;
            let views: Vec<GoalView> = state
                .goals
                .iter()
                .map(|goal| GoalView {
                    goal,
                    milestones: state.milestones.iter().filter(|m| m.goal_id == goal.id).collect(),
                    months: state
                        .monthly_tracking
                        .iter()
                        .filter(|m| m.goal_id == goal.id)
                        .collect(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        GoalAction::Progress { id, percent } => {
            let goal = tracker.set_goal_progress(&id, percent, today)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Milestone { goal_id, title } => {
            let milestone = tracker.add_milestone(&goal_id, &title, today)?;
            println!("{}", serde_json::to_string_pretty(&milestone)?);
        }
        GoalAction::Check { id } => {
            let goal = tracker.toggle_milestone(&id, today)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Month {
            goal_id,
            month,
            done,
            value,
        } => {
            let entry = tracker.track_month(&goal_id, month, done, value)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        GoalAction::Delete { id } => {
            tracker.delete_goal(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
