use clap::Subcommand;
use leagues_core::model::{format_hms, format_leagues};

use super::print_event;
use crate::context::Context;
use crate::prompt::TerminalPrompter;

#[derive(Subcommand)]
pub enum GoalAction {
    /// List goals (the current one is marked with *)
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a goal and select it
    New {
        /// Goal name (prompted when omitted)
        name: Option<String>,
    },
    /// Rename the current goal
    Rename {
        /// New name (prompted when omitted)
        name: Option<String>,
    },
    /// Delete the current goal
    Delete {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Make a goal current
    Select {
        /// Goal id or exact name
        goal: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open()?;
    let app = &mut ctx.app;

    match action {
        GoalAction::List { json } => {
            let current = app.goals().current_id();
            if json {
                let goals: Vec<_> = app
                    .goals()
                    .list()
                    .iter()
                    .map(|g| {
                        serde_json::json!({
                            "id": g.id,
                            "name": g.name,
                            "totalTime": g.total_time,
                            "leagues": g.leagues(),
                            "progress": g.progress(),
                            "logs": g.logs.len(),
                            "current": Some(g.id.as_str()) == current,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&goals)?);
            } else {
                for g in app.goals().list() {
                    let mark = if Some(g.id.as_str()) == current { "*" } else { " " };
                    println!(
                        "{mark} {:<24} {}  {:>6} leagues  {}",
                        g.name,
                        format_hms(g.total_time),
                        format_leagues(g.total_time),
                        g.id
                    );
                }
            }
        }
        GoalAction::New { name } => {
            let mut prompter = TerminalPrompter::new().preset(name);
            if let Some(event) = app.new_goal(&mut prompter)? {
                print_event(&event)?;
            }
        }
        GoalAction::Rename { name } => {
            let mut prompter = TerminalPrompter::new().preset(name);
            if let Some(event) = app.rename_goal(&mut prompter)? {
                print_event(&event)?;
            }
        }
        GoalAction::Delete { yes } => {
            let mut prompter = TerminalPrompter::new().assume_yes(yes);
            match app.delete_goal(&mut prompter)? {
                Some(event) => print_event(&event)?,
                None => eprintln!("cancelled"),
            }
        }
        GoalAction::Select { goal } => match app.select_goal(&goal)? {
            Some(event) => print_event(&event)?,
            None => return Err(format!("no goal matches: {goal}").into()),
        },
    }
    Ok(())
}
