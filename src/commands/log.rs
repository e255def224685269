use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;

use liftlog_core::progression::next_uncompleted;
use liftlog_core::{reduce, Action, NewLog, Phase, Repository};

use super::resolve_lift;

/// Record a performed set and mark its phase done
#[derive(Args)]
pub struct LogCommand {
    /// Lift ID (UUID) or name
    pub identifier: String,

    /// Weight lifted
    #[arg(long, short)]
    pub weight: f64,

    /// Reps performed
    #[arg(long, short)]
    pub reps: u32,

    /// Phase this set completes (5-5-5, 3-3-3, 5-3-1); defaults to the next one due
    #[arg(long, short)]
    pub phase: Option<Phase>,

    /// Date performed (YYYY-MM-DD), defaults to now
    #[arg(long, short)]
    pub date: Option<String>,
}

impl LogCommand {
    pub async fn run(&self, repo: &Repository) -> Result<(), Box<dyn std::error::Error>> {
        let state = repo.load_state().await?;
        let lift = resolve_lift(&state, &self.identifier)?.clone();

        let phase = match self.phase.or_else(|| next_uncompleted(&state.cycle_for(lift.id))) {
            Some(phase) => phase,
            None => {
                return Err(format!(
                    "{} has finished every phase this cycle; pass --phase to log anyway",
                    lift.name
                )
                .into())
            }
        };

        let mut new_log = NewLog::new(lift.id, self.weight, self.reps);
        if let Some(date) = &self.date {
            new_log = new_log.with_date(parse_date(date)?);
        }

        let (log, cycle) = repo.log_set(new_log, phase).await?;
        println!("Logged {} {}: {}", lift.name, phase, log);
        println!("Cycle: {}", cycle);

        let state = reduce(state, Action::LogAdded(log));
        let state = reduce(state, Action::CycleSaved(cycle));
        if state.ready_for_new_cycle() {
            println!("\nEvery lift has finished this cycle. Run `lift cycle start` to begin the next one.");
        }
        Ok(())
    }
}

/// Parse a YYYY-MM-DD date as noon UTC
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", value))?;
    date.and_hms_opt(12, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("Invalid date '{}'", value))
}
