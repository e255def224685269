use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod db;

use commands::{
    ConfigCommand, CycleCommand, HistoryCommand, LiftCommand, LogCommand, WorkoutCommand,
};
use config::Config;
use db::open_repository;

#[derive(Parser)]
#[command(name = "lift")]
#[command(version)]
#[command(about = "A 5/3/1 strength training tracker", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log store activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage lifts
    Lift(LiftCommand),

    /// Show prescribed sets for a lift
    Workout(WorkoutCommand),

    /// Record a performed set
    Log(LogCommand),

    /// Show logged sets
    History(HistoryCommand),

    /// Check cycle progress or start a new cycle
    Cycle(CycleCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lift=debug,liftlog_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Lift(cmd)) => {
            let repo = open_repository(&config).await?;
            cmd.run(&repo).await?;
        }
        Some(Commands::Workout(cmd)) => {
            let repo = open_repository(&config).await?;
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Log(cmd)) => {
            let repo = open_repository(&config).await?;
            cmd.run(&repo).await?;
        }
        Some(Commands::History(cmd)) => {
            let repo = open_repository(&config).await?;
            cmd.run(&repo).await?;
        }
        Some(Commands::Cycle(cmd)) => {
            let repo = open_repository(&config).await?;
            cmd.run(&repo).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
