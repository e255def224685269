//! Workout prescription from percentage-of-max templates.
//!
//! Everything here is pure: a lift's max and rounding setting plus a
//! template resolve to concrete weights, reps and per-side plate loadings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Lift, Phase, Round};

/// Weight of an empty standard barbell.
pub const DEFAULT_BAR_WEIGHT: f64 = 45.0;

/// Plates available per side when none are configured.
pub const DEFAULT_PLATES: [f64; 5] = [45.0, 25.0, 10.0, 5.0, 2.5];

/// Highest rep count that still counts toward a one-rep-max estimate.
pub const ORM_REP_CAP: u32 = 12;

/// One entry of a workout template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSpec {
    /// Fraction of the training max, in (0, 1].
    pub percent: f64,
    pub reps: u32,
}

const fn spec(percent: f64, reps: u32) -> MovementSpec {
    MovementSpec { percent, reps }
}

const WARMUP: [MovementSpec; 3] = [spec(0.40, 5), spec(0.50, 5), spec(0.60, 3)];
const FIVES: [MovementSpec; 3] = [spec(0.65, 5), spec(0.75, 5), spec(0.85, 5)];
const THREES: [MovementSpec; 3] = [spec(0.70, 3), spec(0.80, 3), spec(0.90, 3)];
const FIVE_THREE_ONE: [MovementSpec; 3] = [spec(0.75, 5), spec(0.85, 3), spec(0.95, 1)];

/// A named template: the warmup or one of the cycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workout {
    Warmup,
    Phase(Phase),
}

impl Workout {
    pub fn template(&self) -> &'static [MovementSpec] {
        match self {
            Workout::Warmup => &WARMUP,
            Workout::Phase(Phase::Five) => &FIVES,
            Workout::Phase(Phase::Three) => &THREES,
            Workout::Phase(Phase::One) => &FIVE_THREE_ONE,
        }
    }
}

impl From<Phase> for Workout {
    fn from(phase: Phase) -> Self {
        Workout::Phase(phase)
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workout::Warmup => write!(f, "warmup"),
            Workout::Phase(phase) => write!(f, "{}", phase),
        }
    }
}

/// A fully resolved set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub weight: f64,
    pub reps: u32,
    /// Plates loaded on each side of the bar, largest first.
    pub plates: Vec<f64>,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6} x {:<2}", self.weight, self.reps)?;
        if self.plates.is_empty() {
            write!(f, "  (empty bar)")
        } else {
            let plates: Vec<String> = self.plates.iter().map(|p| p.to_string()).collect();
            write!(f, "  [{}] per side", plates.join(", "))
        }
    }
}

/// Available plate weights, kept sorted largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plates(Vec<f64>);

impl Plates {
    /// Sorts descending and drops non-positive or non-finite weights.
    pub fn new(weights: impl IntoIterator<Item = f64>) -> Self {
        let mut weights: Vec<f64> = weights
            .into_iter()
            .filter(|w| w.is_finite() && *w > 0.0)
            .collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        weights.dedup();
        Self(weights)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Default for Plates {
    fn default() -> Self {
        Self::new(DEFAULT_PLATES)
    }
}

/// Rounds to the nearest multiple of `factor`, halves rounding up.
pub fn round_to_factor(weight: f64, factor: f64) -> f64 {
    ((weight + factor / 2.0) / factor).floor() * factor
}

/// Greedy per-side plate decomposition of `remaining` added weight.
///
/// `plates` must be sorted largest first. Plates go on in pairs, so a plate
/// is taken while its double still fits; otherwise it is dropped and the
/// next smaller one is tried. Each step either shrinks the plate list or
/// reduces `remaining`, so this always terminates.
pub fn calc_plates(plates: &[f64], remaining: f64) -> Vec<f64> {
    let mut used = Vec::new();
    let mut remaining = remaining;
    let mut available = plates;

    while let Some((&largest, smaller)) = available.split_first() {
        if remaining <= 0.0 {
            break;
        }
        if largest > 0.0 && largest * 2.0 <= remaining {
            used.push(largest);
            remaining -= largest * 2.0;
        } else {
            available = smaller;
        }
    }

    used
}

/// Resolves every template entry to a weight, reps and plate loading.
///
/// Weights never drop below the empty bar.
pub fn apply_template(
    max: f64,
    bar_weight: f64,
    plates: &Plates,
    round: Round,
    template: &[MovementSpec],
) -> Vec<Movement> {
    template
        .iter()
        .map(|spec| {
            let target = round_to_factor(spec.percent * max, round.value());
            let weight = target.max(bar_weight);
            Movement {
                weight,
                reps: spec.reps,
                plates: calc_plates(plates.as_slice(), weight - bar_weight),
            }
        })
        .collect()
}

/// Prescribes `workout` for `lift`.
pub fn plan_for(lift: &Lift, bar_weight: f64, plates: &Plates, workout: Workout) -> Vec<Movement> {
    apply_template(lift.max, bar_weight, plates, lift.round, workout.template())
}

/// One-rep-max estimate from a performed set. Reps above
/// [`ORM_REP_CAP`] count as the cap.
pub fn one_rep_max(weight: f64, reps: u32) -> f64 {
    let reps = reps.min(ORM_REP_CAP) as f64;
    (weight * (1.0 + reps / 30.0)).round()
}
