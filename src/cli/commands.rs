//! CLI commands - `list`, `add`, `deposit`, `delete`, `overview` and `help`.
//!
//! Each command returns the text to print so the binary stays a thin shell around
//! [`run_command`].

use crate::{
    config::DisplaySettings,
    core::{
        draft::{DepositDraft, NewGoalDraft},
        report::{format_goal_card, format_overview},
    },
    errors::{Error, Result},
    store::{GoalStore, Outcome, SkipReason},
};
use chrono::{DateTime, Utc};

/// Usage summary printed by `help`
pub const HELP_TEXT: &str = "\
Smart Goal Planner
Usage: goal-planner <command>

Commands
  list                                         Show every goal with progress and status
  add <name> <target> <category> <deadline>    Create a goal (deadline as YYYY-MM-DD)
  deposit <goal> <amount>                      Add money to a goal (goal by id or name)
  delete <goal>                                Remove a goal (goal by id or name)
  overview                                     Show total goals, total saved, completed goals
  help                                         Show this help message

Without a command the goal list and the overview are shown.";

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List followed by overview
    Dashboard,
    /// Print every goal card
    List,
    /// Submit a new goal
    Add(NewGoalDraft),
    /// Deposit into a goal
    Deposit {
        /// Goal id or name
        goal: String,
        /// Amount as typed
        amount: String,
    },
    /// Delete a goal
    Delete {
        /// Goal id or name
        goal: String,
    },
    /// Print the aggregate overview
    Overview,
    /// Print usage
    Help,
}

/// Process exit status for a failed command: 2 for a command line that could not
/// be understood, 1 for everything else.
#[must_use]
pub const fn exit_code(err: &Error) -> u8 {
    match err {
        Error::Usage { .. } => 2,
        _ => 1,
    }
}

fn usage(message: &str) -> Error {
    Error::Usage {
        message: format!("{message}\n\n{HELP_TEXT}"),
    }
}

/// Parses the arguments following the program name.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Dashboard);
    };

    match (name.as_str(), rest) {
        ("list", []) => Ok(Command::List),
        ("overview", []) => Ok(Command::Overview),
        ("help" | "--help" | "-h", _) => Ok(Command::Help),
        ("add", [goal_name, target, category, deadline]) => Ok(Command::Add(NewGoalDraft::new(
            goal_name.as_str(),
            target.as_str(),
            category.as_str(),
            deadline.as_str(),
        ))),
        ("add", _) => Err(usage("add needs <name> <target> <category> <deadline>")),
        ("deposit", [goal, amount]) => Ok(Command::Deposit {
            goal: goal.clone(),
            amount: amount.clone(),
        }),
        ("deposit", _) => Err(usage("deposit needs <goal> <amount>")),
        ("delete", [goal]) => Ok(Command::Delete { goal: goal.clone() }),
        ("delete", _) => Err(usage("delete needs <goal>")),
        ("list" | "overview", _) => Err(usage(&format!("{name} takes no arguments"))),
        (other, _) => Err(usage(&format!("Unknown command '{other}'"))),
    }
}

fn render_goals(store: &GoalStore, now: DateTime<Utc>, display: &DisplaySettings) -> String {
    if store.goals().is_empty() {
        return "No goals yet. Add one with `goal-planner add`.".to_string();
    }

    store
        .goals()
        .iter()
        .map(|goal| format_goal_card(goal, now, display))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs one command against a store whose cache is already loaded.
///
/// Returns the text to print.
pub async fn run_command(
    store: &mut GoalStore,
    command: Command,
    display: &DisplaySettings,
    now: DateTime<Utc>,
) -> Result<String> {
    match command {
        Command::Dashboard => Ok(format!(
            "{}\n\n{}",
            render_goals(store, now, display),
            format_overview(&store.overview(), display)
        )),
        Command::List => Ok(render_goals(store, now, display)),
        Command::Overview => Ok(format_overview(&store.overview(), display)),
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Add(draft) => {
            store.set_new_goal_draft(draft);
            match store.create_goal_at(now).await? {
                Outcome::Applied => Ok(format!(
                    "✅ Goal added.\n\n{}",
                    render_goals(store, now, display)
                )),
                Outcome::Skipped(_) => Ok(
                    "❌ Name, target amount, category and deadline are all required.".to_string(),
                ),
            }
        }
        Command::Deposit { goal, amount } => {
            let goal_id = store
                .resolve_goal(&goal)
                .map_or_else(|_| goal.clone(), |found| found.id.to_string());
            store.set_deposit_draft(DepositDraft::new(goal_id.as_str(), amount));

            match store.apply_deposit().await? {
                Outcome::Applied => {
                    let card = store
                        .resolve_goal(&goal_id)
                        .map(|found| format_goal_card(found, now, display))?;
                    Ok(format!("✅ Deposit recorded.\n\n{card}"))
                }
                Outcome::Skipped(SkipReason::MissingAmount) => {
                    Ok("❌ Enter an amount to deposit.".to_string())
                }
                Outcome::Skipped(_) => Ok(format!("❌ No goal matches '{goal}'.")),
            }
        }
        Command::Delete { goal } => {
            let (id, name) = {
                let found = store.resolve_goal(&goal)?;
                (found.id.clone(), found.name.clone())
            };
            store.delete_goal(&id).await?;
            Ok(format!("🗑️ Deleted goal '{name}' (id: {id})."))
        }
    }
}
