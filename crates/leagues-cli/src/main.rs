use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use leagues_core::storage::DurationStyle;
use leagues_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod prompt;

#[derive(Parser)]
#[command(name = "leagues", version, about = "Leagues: walk your goals one hour at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current goal, its leagues and the running session
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Work session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Run an interactive pomodoro cycle
    Pomodoro {
        /// Focus length in minutes (overrides config)
        #[arg(long)]
        focus_minutes: Option<u32>,
        /// Break length in minutes (overrides config)
        #[arg(long)]
        break_minutes: Option<u32>,
    },
    /// Show the current goal's log feed, newest first
    Log {
        /// Duration format (defaults to display.duration_style)
        #[arg(long, value_enum)]
        style: Option<commands::log::Style>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign in to sync goals to your remote document
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Delete ALL goals and logs
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LEAGUES_LOG").unwrap_or_else(|_| {
        let level = Config::load_or_default().logging.level;
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Status { json } => commands::status::run(json),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Pomodoro {
            focus_minutes,
            break_minutes,
        } => commands::pomodoro::run(focus_minutes, break_minutes),
        Commands::Log { style, json } => commands::log::run(style.map(DurationStyle::from), json),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "leagues", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
