//! In-memory application state and the reducer that folds store results
//! into it.
//!
//! The state is rebuilt from actions only; it never talks to storage.

use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Cycle, Lift, Log};
use crate::progression;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub lifts: Vec<Lift>,
    pub cycles: Vec<Cycle>,
    pub logs: Vec<Log>,
}

/// Something that happened in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Full snapshot replacing whatever was held.
    Loaded {
        lifts: Vec<Lift>,
        cycles: Vec<Cycle>,
        logs: Vec<Log>,
    },
    LiftSaved(Lift),
    CycleSaved(Cycle),
    LogAdded(Log),
    CycleStarted {
        cycles: Vec<Cycle>,
        lifts: Vec<Lift>,
    },
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> Uuid) {
    let key = id(&item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

pub fn reduce(mut state: State, action: Action) -> State {
    match action {
        Action::Loaded {
            lifts,
            cycles,
            logs,
        } => {
            state = State {
                lifts,
                cycles,
                logs,
            };
        }
        Action::LiftSaved(lift) => upsert(&mut state.lifts, lift, |l| l.id),
        Action::CycleSaved(cycle) => upsert(&mut state.cycles, cycle, |c| c.id),
        Action::LogAdded(log) => upsert(&mut state.logs, log, |l| l.id),
        Action::CycleStarted { cycles, lifts } => {
            for cycle in cycles {
                upsert(&mut state.cycles, cycle, |c| c.id);
            }
            for lift in lifts {
                upsert(&mut state.lifts, lift, |l| l.id);
            }
        }
    }
    state
}

impl State {
    pub fn lift(&self, id: Uuid) -> Option<&Lift> {
        self.lifts.iter().find(|lift| lift.id == id)
    }

    /// Finds a lift by id or by case-insensitive name.
    pub fn find_lift(&self, identifier: &str) -> Option<&Lift> {
        let identifier = identifier.trim();
        if let Ok(id) = Uuid::parse_str(identifier) {
            if let Some(lift) = self.lift(id) {
                return Some(lift);
            }
        }
        self.lifts
            .iter()
            .find(|lift| lift.name.eq_ignore_ascii_case(identifier))
    }

    /// The lift's cycle, or an empty one if it was never written.
    pub fn cycle_for(&self, lift_id: Uuid) -> Cycle {
        self.cycles
            .iter()
            .find(|cycle| cycle.id == lift_id)
            .copied()
            .unwrap_or_else(|| Cycle::new(lift_id))
    }

    /// Logs for one lift, oldest first.
    pub fn logs_for(&self, lift_id: Uuid) -> Vec<&Log> {
        let mut logs: Vec<&Log> = self
            .logs
            .iter()
            .filter(|log| log.lift_id == lift_id)
            .collect();
        logs.sort_by_key(|log| log.date);
        logs
    }

    /// Highest one-rep-max estimate logged for a lift.
    pub fn best_orm(&self, lift_id: Uuid) -> Option<f64> {
        self.logs
            .iter()
            .filter(|log| log.lift_id == lift_id)
            .map(|log| log.orm)
            .reduce(f64::max)
    }

    /// The lift a log belongs to.
    pub fn lift_of(&self, log: &Log) -> Result<&Lift> {
        self.lift(log.lift_id)
            .ok_or_else(|| StoreError::OrphanReference {
                kind: "log",
                id: log.id.to_string(),
                lift_id: log.lift_id.to_string(),
            })
    }

    /// True once every lift has completed every phase.
    pub fn ready_for_new_cycle(&self) -> bool {
        if self.lifts.is_empty() {
            return false;
        }
        let cycles: Vec<Cycle> = self.lifts.iter().map(|l| self.cycle_for(l.id)).collect();
        progression::cycle_finished(&cycles)
    }
}
