mod config_cmd;
mod cycle;
mod history;
mod lift;
mod log;
mod workout;

pub use config_cmd::ConfigCommand;
pub use cycle::CycleCommand;
pub use history::HistoryCommand;
pub use lift::LiftCommand;
pub use log::LogCommand;
pub use workout::WorkoutCommand;

use clap::ValueEnum;
use liftlog_core::{Lift, State};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Find a lift by ID (UUID) or name
pub fn resolve_lift<'a>(
    state: &'a State,
    identifier: &str,
) -> Result<&'a Lift, Box<dyn std::error::Error>> {
    state
        .find_lift(identifier)
        .ok_or_else(|| format!("Lift not found: {}", identifier).into())
}
