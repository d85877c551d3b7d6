//! Roster sync worker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p roster-worker -- run
//! ```
//!
//! Configuration is loaded from environment variables.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use roster_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

/// Keeps the chat platform in step with the team roster
#[derive(Parser, Debug)]
#[command(name = "roster-worker")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the role and channel processors (default)
    Run,

    /// Apply database migrations and exit
    Migrate,

    /// Reconcile a team's age-based roles once and print the changes
    ReconcileAges {
        /// Team id
        #[arg(long)]
        team: Uuid,

        /// Reference year for ages (defaults to the current year)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2200))]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(env = ?config.app.env, name = %config.app.name, "Configuration loaded");

    if let Err(e) = run(cli.command.unwrap_or(Command::Run), config).await {
        error!(error = format!("{e:#}"), "Worker failed");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Run => roster_worker::run(config).await,
        Command::Migrate => roster_worker::migrate(config).await,
        Command::ReconcileAges { team, year } => {
            let changes = roster_worker::reconcile_ages(config, team, year).await?;
            println!("{}", serde_json::to_string_pretty(&changes)?);
            Ok(())
        }
    }
}
