use clap::{Args, Subcommand};
use serde_json::json;

use liftlog_core::progression::next_uncompleted;
use liftlog_core::Repository;

use super::OutputFormat;

#[derive(Args)]
pub struct CycleCommand {
    #[command(subcommand)]
    pub command: CycleSubcommand,
}

#[derive(Subcommand)]
pub enum CycleSubcommand {
    /// Show phase progress for every lift
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Reset every lift's cycle to begin the next block
    Start {
        /// Raise each lift's max by its increment
        #[arg(long)]
        increase_maxes: bool,

        /// Start even if some lifts have unfinished phases
        #[arg(long, short)]
        force: bool,
    },
}

impl CycleCommand {
    pub async fn run(&self, repo: &Repository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CycleSubcommand::Status { format } => {
                let state = repo.load_state().await?;
                if state.lifts.is_empty() {
                    println!("No lifts found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let lifts: Vec<_> = state
                            .lifts
                            .iter()
                            .map(|lift| {
                                let cycle = state.cycle_for(lift.id);
                                json!({
                                    "id": lift.id,
                                    "name": lift.name,
                                    "cycle": cycle.to_record(),
                                    "next_phase": next_uncompleted(&cycle),
                                })
                            })
                            .collect();
                        let value = json!({
                            "lifts": lifts,
                            "ready_for_new_cycle": state.ready_for_new_cycle(),
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        for lift in &state.lifts {
                            println!("{:<20}  {}", lift.name, state.cycle_for(lift.id));
                        }
                        if state.ready_for_new_cycle() {
                            println!("\nEvery lift is done. Run `lift cycle start` to begin the next cycle.");
                        }
                    }
                }
                Ok(())
            }

            CycleSubcommand::Start {
                increase_maxes,
                force,
            } => {
                let state = repo.load_state().await?;
                if state.lifts.is_empty() {
                    return Err("No lifts to start a cycle for".into());
                }
                if !state.ready_for_new_cycle() && !force {
                    return Err(
                        "Not every lift has finished this cycle. Use --force to start anyway."
                            .into(),
                    );
                }

                let (_, lifts) = repo.start_new_cycle(*increase_maxes).await?;
                println!("Started a new cycle for {} lift(s)", lifts.len());
                if *increase_maxes {
                    for lift in &lifts {
                        println!("  {:<20}  max {}", lift.name, lift.max);
                    }
                }
                Ok(())
            }
        }
    }
}
