use clap::Args;
use serde::Serialize;

use liftlog_core::{Log, Repository, State};

use super::{resolve_lift, OutputFormat};

/// Show logged sets, oldest first
#[derive(Args)]
pub struct HistoryCommand {
    /// Only show this lift (ID or name)
    pub identifier: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    lift: &'a str,
    #[serde(flatten)]
    log: &'a Log,
}

impl HistoryCommand {
    pub async fn run(&self, repo: &Repository) -> Result<(), Box<dyn std::error::Error>> {
        let state = repo.load_state().await?;

        let entries: Vec<HistoryEntry<'_>> = match &self.identifier {
            Some(identifier) => {
                let lift = resolve_lift(&state, identifier)?;
                state
                    .logs_for(lift.id)
                    .into_iter()
                    .map(|log| HistoryEntry {
                        lift: &lift.name,
                        log,
                    })
                    .collect()
            }
            None => all_entries(&state),
        };

        if entries.is_empty() {
            println!("No logs found");
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                println!(
                    "{:<16}  {:<20}  {:>7}  {:>4}  {:>7}",
                    "DATE", "LIFT", "WEIGHT", "REPS", "EST 1RM"
                );
                println!("{}", "-".repeat(62));
                for entry in &entries {
                    println!(
                        "{:<16}  {:<20}  {:>7}  {:>4}  {:>7}",
                        entry.log.date.format("%Y-%m-%d %H:%M").to_string(),
                        entry.lift,
                        entry.log.weight,
                        entry.log.reps,
                        entry.log.orm
                    );
                }
                println!("\nTotal: {} set(s)", entries.len());
            }
        }
        Ok(())
    }
}

// Every log with its lift name, oldest first. Logs whose lift is gone are skipped.
fn all_entries(state: &State) -> Vec<HistoryEntry<'_>> {
    let mut entries: Vec<HistoryEntry<'_>> = state
        .logs
        .iter()
        .filter_map(|log| match state.lift_of(log) {
            Ok(lift) => Some(HistoryEntry {
                lift: &lift.name,
                log,
            }),
            Err(e) => {
                tracing::warn!("skipping log: {}", e);
                None
            }
        })
        .collect();
    entries.sort_by_key(|entry| entry.log.date);
    entries
}
