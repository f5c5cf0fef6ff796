use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use leagues_core::model::{format_hms, format_leagues, now_ms};
use leagues_core::{App, Refusal};

use super::print_event;
use crate::context::Context;
use crate::prompt::TerminalPrompter;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a session on the current goal
    Start,
    /// Stop the running session and log it
    Stop {
        /// What you accomplished (prompted when omitted)
        #[arg(long)]
        note: Option<String>,
    },
    /// Print the running session
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show the running session live until Ctrl-C
    Watch,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open()?;
    let app = &mut ctx.app;

    match action {
        SessionAction::Start => {
            let event = app.start_session(now_ms())?;
            print_event(&event)?;
        }
        SessionAction::Stop { note } => {
            let mut prompter = TerminalPrompter::new().preset(note);
            let event = app.stop_session(&mut prompter, now_ms())?;
            print_event(&event)?;
        }
        SessionAction::Status { json } => {
            let now = now_ms();
            let session = app.session();
            if json {
                let value = serde_json::json!({
                    "state": session.state(),
                    "marker": session.marker(),
                    "elapsedSecs": session.elapsed_secs(now),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if session.is_running() {
                println!("{:?} {}", session.state(), format_hms(session.elapsed_secs(now)));
            } else {
                println!("No session running.");
            }
        }
        SessionAction::Watch => watch(app)?,
    }
    Ok(())
}

/// Re-derive the elapsed time from the marker once a second.
fn watch(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let Some(goal_id) = app.session().goal_id() else {
        return Err(Refusal::NoSessionRunning.into());
    };
    let (name, stored) = app
        .goals()
        .get(goal_id)
        .map(|g| (g.name.clone(), g.total_time))
        .unwrap_or_default();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let elapsed = app.session().elapsed_secs(now_ms());
                    let total = stored + elapsed;
                    print!(
                        "\r{name}  {}  total {}  {} leagues ",
                        format_hms(elapsed),
                        format_hms(total),
                        format_leagues(total)
                    );
                    let _ = std::io::stdout().flush();
                }
                _ = &mut ctrl_c => break,
            }
        }
    });
    println!();
    Ok(())
}
