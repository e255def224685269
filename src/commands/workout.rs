use clap::Args;
use serde_json::json;
use std::fmt::Write;

use liftlog_core::plan::plan_for;
use liftlog_core::progression::next_uncompleted;
use liftlog_core::{Lift, Movement, Phase, Repository, Workout};

use super::{resolve_lift, OutputFormat};
use crate::config::Config;

/// Show today's prescribed sets for a lift
#[derive(Args)]
pub struct WorkoutCommand {
    /// Lift ID (UUID) or name
    pub identifier: String,

    /// Phase to prescribe (5-5-5, 3-3-3, 5-3-1); defaults to the next one due
    #[arg(long, short)]
    pub phase: Option<Phase>,

    /// Leave out the warmup sets
    #[arg(long)]
    pub no_warmup: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl WorkoutCommand {
    pub async fn run(
        &self,
        repo: &Repository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let state = repo.load_state().await?;
        let lift = resolve_lift(&state, &self.identifier)?;

        let phase = match self.phase.or_else(|| next_uncompleted(&state.cycle_for(lift.id))) {
            Some(phase) => phase,
            None => {
                println!(
                    "{} has finished every phase this cycle. Run `lift cycle start` once all lifts are done, or pick one with --phase.",
                    lift.name
                );
                return Ok(());
            }
        };

        let bar = config.bar_weight.value;
        let plates = config.plates();
        let warmup = if self.no_warmup {
            Vec::new()
        } else {
            plan_for(lift, bar, &plates, Workout::Warmup)
        };
        let sets = plan_for(lift, bar, &plates, Workout::from(phase));

        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "lift": lift,
                    "phase": phase,
                    "bar_weight": bar,
                    "warmup": warmup,
                    "sets": sets,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                print!("{}", render_workout(lift, phase, &warmup, &sets));
            }
        }
        Ok(())
    }
}

/// Render a prescription as text
fn render_workout(lift: &Lift, phase: Phase, warmup: &[Movement], sets: &[Movement]) -> String {
    let mut out = String::new();
    let title = format!("{} {} (max {})", lift.name, phase, lift.max);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.len()));

    if !warmup.is_empty() {
        let _ = writeln!(out, "\nWarmup");
        for movement in warmup {
            let _ = writeln!(out, "  {}", movement);
        }
    }

    let _ = writeln!(out, "\nWork sets");
    for movement in sets {
        let _ = writeln!(out, "  {}", movement);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_core::{Increment, LiftRecord, Plates, Round};
    use uuid::Uuid;

    fn bench() -> Lift {
        Lift::from_record(
            Uuid::new_v4(),
            LiftRecord::new("bench", 135.0, Increment::Five, Round::Five),
        )
    }

    #[test]
    fn test_render_workout_lists_sets_and_plates() {
        let lift = bench();
        let plates = Plates::default();
        let sets = plan_for(&lift, 45.0, &plates, Workout::from(Phase::Five));

        let output = render_workout(&lift, Phase::Five, &[], &sets);
        assert!(output.starts_with("bench 5-5-5 (max 135)"));
        assert!(!output.contains("Warmup"));
        // 65% of 135 rounds to 90: 45 bar + 22.5 per side
        assert!(output.contains("[10, 10, 2.5] per side"));
        assert!(output.contains("[25, 10] per side"));
    }

    #[test]
    fn test_render_workout_with_warmup() {
        let lift = bench();
        let plates = Plates::default();
        let warmup = plan_for(&lift, 45.0, &plates, Workout::Warmup);
        let sets = plan_for(&lift, 45.0, &plates, Workout::from(Phase::One));

        let output = render_workout(&lift, Phase::One, &warmup, &sets);
        let warmup_at = output.find("Warmup").unwrap();
        let work_at = output.find("Work sets").unwrap();
        assert!(warmup_at < work_at);
        // 40% of 135 rounds to 55: one 5 per side
        assert!(output.contains("[5] per side"));
    }
}
