use clap::Subcommand;
use leagues_core::{BackendKind, Config, Event, Prompter};

use crate::context::Context;
use crate::prompt::TerminalPrompter;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in; goals move to your remote document
    Login {
        /// User id (prompted when omitted)
        #[arg(long)]
        user: Option<String>,
        /// Bearer token for the remote endpoint, kept in the OS keyring
        #[arg(long)]
        token: Option<String>,
    },
    /// Sign out; goals on this machine are used again
    Logout,
    /// Show who is signed in and where goals are stored
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { user, token } => {
            let mut prompter = TerminalPrompter::new().preset(user);
            let user = prompter
                .ask("User id:", None)
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .ok_or("a user id is required")?;

            let mut ctx = Context::open_with(Config::load()?, token.clone())?;
            match ctx.app.sign_in(&mut ctx.identity, &user, token.as_deref())? {
                Some(Event::BackendSwitched { migrated: true, .. }) => {
                    println!("Signed in as {user}; local goals copied to your document")
                }
                _ => println!("Signed in as {user}"),
            }
        }
        AuthAction::Logout => {
            let mut ctx = Context::open()?;
            if ctx.app.user().is_none() {
                println!("Not signed in");
                return Ok(());
            }
            ctx.app.sign_out(&mut ctx.identity)?;
            println!("Signed out");
        }
        AuthAction::Status => {
            let ctx = Context::open()?;
            match ctx.app.goals().backend_kind() {
                BackendKind::Remote { user_id } => {
                    let endpoint = ctx.app.config().remote.endpoint.as_str();
                    let target = if endpoint.is_empty() {
                        "local document files"
                    } else {
                        endpoint
                    };
                    println!("Signed in as {user_id} ({target})");
                }
                BackendKind::Local => println!("Not signed in"),
            }
        }
    }
    Ok(())
}
