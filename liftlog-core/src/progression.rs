//! Cycle progression: which phase is next, whether a block is finished, and
//! the bulk rollover into a new block.

use crate::models::{Cycle, Lift, Phase};

/// Returns the first phase, in training order, not yet completed.
///
/// `None` exactly when [`all_complete`] holds; callers decide what a
/// finished cycle means for them.
pub fn next_uncompleted(cycle: &Cycle) -> Option<Phase> {
    Phase::ALL
        .into_iter()
        .find(|phase| !cycle.is_complete(*phase))
}

pub fn all_complete(cycle: &Cycle) -> bool {
    Phase::ALL.iter().all(|phase| cycle.is_complete(*phase))
}

/// True when every cycle in the collection is complete.
pub fn cycle_finished(cycles: &[Cycle]) -> bool {
    cycles.iter().all(all_complete)
}

/// Returns a copy of `cycle` with `phase` marked complete.
pub fn log_phase(cycle: &Cycle, phase: Phase) -> Cycle {
    let mut next = *cycle;
    next.set_complete(phase, true);
    next
}

/// Resets every cycle and, if `increase_maxes`, raises every lift's max by
/// its own increment.
pub fn start_new_cycle(
    cycles: &[Cycle],
    lifts: &[Lift],
    increase_maxes: bool,
) -> (Vec<Cycle>, Vec<Lift>) {
    let cycles = cycles.iter().map(|cycle| Cycle::new(cycle.id)).collect();
    let lifts = lifts
        .iter()
        .map(|lift| {
            if increase_maxes {
                lift.incremented()
            } else {
                lift.clone()
            }
        })
        .collect();
    (cycles, lifts)
}
