use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod storage;

#[derive(Parser)]
#[command(name = "taskcal", version, about = "Prioritize and schedule a personal task list")]
struct Cli {
    /// Treat this instant (RFC 3339) as the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Priority ranking, urgency, conflicts and slot suggestions
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Upcoming scheduled tasks
    Upcoming(commands::upcoming::UpcomingArgs),
    /// Heuristic suggestions
    Suggest {
        #[command(subcommand)]
        action: commands::suggest::SuggestAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Plan { action } => commands::plan::run(action, now),
        Commands::Upcoming(args) => commands::upcoming::run(args),
        Commands::Suggest { action } => commands::suggest::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
