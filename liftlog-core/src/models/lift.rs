use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Amount added to a lift's max when a new cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Increment {
    Five,
    Ten,
}

impl Increment {
    pub fn value(&self) -> f64 {
        match self {
            Increment::Five => 5.0,
            Increment::Ten => 10.0,
        }
    }
}

impl TryFrom<f64> for Increment {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        if value == 5.0 {
            Ok(Increment::Five)
        } else if value == 10.0 {
            Ok(Increment::Ten)
        } else {
            Err(format!(
                "Invalid increment '{}'. Valid options: 5, 10",
                value
            ))
        }
    }
}

impl From<Increment> for f64 {
    fn from(increment: Increment) -> Self {
        increment.value()
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Increment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid increment '{}'. Valid options: 5, 10", s))?;
        Increment::try_from(value)
    }
}

/// Granularity prescribed weights are rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Round {
    One,
    TwoAndHalf,
    Five,
}

impl Round {
    pub fn value(&self) -> f64 {
        match self {
            Round::One => 1.0,
            Round::TwoAndHalf => 2.5,
            Round::Five => 5.0,
        }
    }
}

impl TryFrom<f64> for Round {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(Round::One)
        } else if value == 2.5 {
            Ok(Round::TwoAndHalf)
        } else if value == 5.0 {
            Ok(Round::Five)
        } else {
            Err(format!(
                "Invalid round '{}'. Valid options: 1, 2.5, 5",
                value
            ))
        }
    }
}

impl From<Round> for f64 {
    fn from(round: Round) -> Self {
        round.value()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid round '{}'. Valid options: 1, 2.5, 5", s))?;
        Round::try_from(value)
    }
}

/// A trainable movement with its current training max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lift {
    pub id: Uuid,
    pub name: String,
    pub max: f64,
    pub increment: Increment,
    pub round: Round,
}

/// Stored shape of a lift; the id is the table key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRecord {
    pub name: String,
    pub max: f64,
    pub increment: Increment,
    pub round: Round,
}

impl LiftRecord {
    pub fn new(name: impl Into<String>, max: f64, increment: Increment, round: Round) -> Self {
        Self {
            name: name.into(),
            max,
            increment,
            round,
        }
    }

    /// Rejects empty names and non-positive maxes.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid("lift name cannot be empty"));
        }
        validate_max(self.max)
    }
}

pub(crate) fn validate_max(max: f64) -> Result<()> {
    if max.is_finite() && max > 0.0 {
        Ok(())
    } else {
        Err(StoreError::invalid(format!(
            "lift max must be a positive number, got {max}"
        )))
    }
}

/// Edits applied to an existing lift. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct LiftChanges {
    pub name: Option<String>,
    pub max: Option<f64>,
    pub increment: Option<Increment>,
    pub round: Option<Round>,
}

impl LiftChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.max.is_none() && self.increment.is_none() && self.round.is_none()
    }
}

impl Lift {
    pub fn from_record(id: Uuid, record: LiftRecord) -> Self {
        Self {
            id,
            name: record.name,
            max: record.max,
            increment: record.increment,
            round: record.round,
        }
    }

    pub fn to_record(&self) -> LiftRecord {
        LiftRecord {
            name: self.name.clone(),
            max: self.max,
            increment: self.increment,
            round: self.round,
        }
    }

    /// Returns a copy with `changes` applied.
    pub fn with_changes(&self, changes: &LiftChanges) -> Self {
        let mut lift = self.clone();
        if let Some(name) = &changes.name {
            lift.name = name.trim().to_string();
        }
        if let Some(max) = changes.max {
            lift.max = max;
        }
        if let Some(increment) = changes.increment {
            lift.increment = increment;
        }
        if let Some(round) = changes.round {
            lift.round = round;
        }
        lift
    }

    /// Returns a copy with the max raised by this lift's increment.
    pub fn incremented(&self) -> Self {
        Self {
            max: self.max + self.increment.value(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Max: {}", self.max)?;
        writeln!(f, "Increment: {}", self.increment)?;
        write!(f, "Round: {}", self.round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench() -> Lift {
        Lift::from_record(
            Uuid::new_v4(),
            LiftRecord::new("bench", 135.0, Increment::Five, Round::Five),
        )
    }

    #[test]
    fn test_increment_from_str() {
        assert_eq!(Increment::from_str("5").unwrap(), Increment::Five);
        assert_eq!(Increment::from_str("10").unwrap(), Increment::Ten);
        assert!(Increment::from_str("7").is_err());
        assert!(Increment::from_str("ten").is_err());
    }

    #[test]
    fn test_round_from_str() {
        assert_eq!(Round::from_str("1").unwrap(), Round::One);
        assert_eq!(Round::from_str("2.5").unwrap(), Round::TwoAndHalf);
        assert_eq!(Round::from_str("5").unwrap(), Round::Five);
        assert!(Round::from_str("3").is_err());
    }

    #[test]
    fn test_record_json_shape() {
        let record = LiftRecord::new("press", 95.0, Increment::Ten, Round::TwoAndHalf);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "press", "max": 95.0, "increment": 10.0, "round": 2.5})
        );

        // Integer-valued numbers from older data parse too
        let parsed: LiftRecord =
            serde_json::from_str(r#"{"name":"press","max":95,"increment":10,"round":1}"#).unwrap();
        assert_eq!(parsed.increment, Increment::Ten);
        assert_eq!(parsed.round, Round::One);
    }

    #[test]
    fn test_record_rejects_out_of_domain_values() {
        let result: std::result::Result<LiftRecord, _> =
            serde_json::from_str(r#"{"name":"press","max":95,"increment":7,"round":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(LiftRecord::new("squat", 225.0, Increment::Ten, Round::Five)
            .validate()
            .is_ok());
        assert!(LiftRecord::new("  ", 225.0, Increment::Ten, Round::Five)
            .validate()
            .is_err());
        assert!(LiftRecord::new("squat", 0.0, Increment::Ten, Round::Five)
            .validate()
            .is_err());
        assert!(LiftRecord::new("squat", f64::NAN, Increment::Ten, Round::Five)
            .validate()
            .is_err());
    }

    #[test]
    fn test_with_changes() {
        let lift = bench();
        let changes = LiftChanges {
            name: Some(" Bench Press ".into()),
            max: Some(140.0),
            ..Default::default()
        };
        let edited = lift.with_changes(&changes);
        assert_eq!(edited.id, lift.id);
        assert_eq!(edited.name, "Bench Press");
        assert_eq!(edited.max, 140.0);
        assert_eq!(edited.increment, Increment::Five);
        assert!(LiftChanges::default().is_empty());
    }

    #[test]
    fn test_incremented() {
        let lift = bench();
        assert_eq!(lift.incremented().max, 140.0);
    }

    #[test]
    fn test_lift_display() {
        let output = format!("{}", bench());
        assert!(output.contains("bench"));
        assert!(output.contains("Max: 135"));
        assert!(output.contains("Round: 5"));
    }
}
