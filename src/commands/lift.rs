use clap::{Args, Subcommand};
use serde_json::json;

use liftlog_core::progression::next_uncompleted;
use liftlog_core::{Increment, LiftChanges, LiftRecord, Repository, Round};

use super::{resolve_lift, OutputFormat};

#[derive(Args)]
pub struct LiftCommand {
    #[command(subcommand)]
    pub command: LiftSubcommand,
}

#[derive(Subcommand)]
pub enum LiftSubcommand {
    /// Add a new lift
    Create {
        /// Lift name (e.g. squat, bench)
        name: String,

        /// Training max
        #[arg(long)]
        max: f64,

        /// Added to the max when a new cycle starts (5 or 10)
        #[arg(long, default_value = "5")]
        increment: Increment,

        /// Round prescribed weights to this step (1, 2.5 or 5)
        #[arg(long, default_value = "5")]
        round: Round,
    },

    /// List all lifts
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a lift with its cycle progress
    Show {
        /// Lift ID (UUID) or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change a lift's settings
    Edit {
        /// Lift ID (UUID) or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New training max
        #[arg(long)]
        max: Option<f64>,

        /// New increment (5 or 10)
        #[arg(long)]
        increment: Option<Increment>,

        /// New rounding step (1, 2.5 or 5)
        #[arg(long)]
        round: Option<Round>,
    },
}

impl LiftCommand {
    pub async fn run(&self, repo: &Repository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            LiftSubcommand::Create {
                name,
                max,
                increment,
                round,
            } => {
                let state = repo.load_state().await?;
                if let Some(existing) = state.find_lift(name) {
                    return Err(format!(
                        "A lift named '{}' already exists ({})",
                        existing.name, existing.id
                    )
                    .into());
                }

                let record = LiftRecord::new(name.as_str(), *max, *increment, *round);
                let (created, _) = repo.create_lift(record).await?;
                println!("Created lift:");
                println!("{}", created);
                Ok(())
            }

            LiftSubcommand::List { format } => {
                let state = repo.load_state().await?;
                if state.lifts.is_empty() {
                    println!("No lifts found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&state.lifts)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<36}  {:<20}  {:>7}  {:>4}  {:>5}  NEXT",
                            "ID", "NAME", "MAX", "INC", "ROUND"
                        );
                        println!("{}", "-".repeat(90));
                        for lift in &state.lifts {
                            let next = next_uncompleted(&state.cycle_for(lift.id))
                                .map(|phase| phase.to_string())
                                .unwrap_or_else(|| "done".to_string());
                            println!(
                                "{:<36}  {:<20}  {:>7}  {:>4}  {:>5}  {}",
                                lift.id,
                                lift.name,
                                lift.max,
                                lift.increment.to_string(),
                                lift.round.to_string(),
                                next
                            );
                        }
                        println!("\nTotal: {} lift(s)", state.lifts.len());
                    }
                }
                Ok(())
            }

            LiftSubcommand::Show { identifier, format } => {
                let state = repo.load_state().await?;
                let lift = resolve_lift(&state, identifier)?;
                let cycle = state.cycle_for(lift.id);
                let next = next_uncompleted(&cycle);
                let best = state.best_orm(lift.id);

                match format {
                    OutputFormat::Json => {
                        let value = json!({
                            "lift": lift,
                            "cycle": cycle.to_record(),
                            "next_phase": next,
                            "best_orm": best,
                            "logs": state.logs_for(lift.id).len(),
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", lift);
                        println!();
                        println!("Cycle: {}", cycle);
                        match next {
                            Some(phase) => println!("Next: {}", phase),
                            None => println!("Next: cycle complete"),
                        }
                        if let Some(best) = best {
                            println!("Best est. 1RM: {}", best);
                        }
                    }
                }
                Ok(())
            }

            LiftSubcommand::Edit {
                identifier,
                name,
                max,
                increment,
                round,
            } => {
                let changes = LiftChanges {
                    name: name.clone(),
                    max: *max,
                    increment: *increment,
                    round: *round,
                };
                if changes.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let state = repo.load_state().await?;
                let lift = resolve_lift(&state, identifier)?;
                if let Some(new_name) = &changes.name {
                    if let Some(other) = state.find_lift(new_name) {
                        if other.id != lift.id {
                            return Err(
                                format!("A lift named '{}' already exists", other.name).into()
                            );
                        }
                    }
                }

                let updated = repo.edit_lift(lift.id, &changes).await?;
                println!("Updated lift:");
                println!("{}", updated);
                Ok(())
            }
        }
    }
}
