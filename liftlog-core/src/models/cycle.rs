use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One of the three fixed workouts of a training cycle, in training order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "5-5-5")]
    Five,
    #[serde(rename = "3-3-3")]
    Three,
    #[serde(rename = "5-3-1")]
    One,
}

impl Phase {
    /// All phases in the order they are trained.
    pub const ALL: [Phase; 3] = [Phase::Five, Phase::Three, Phase::One];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Five => "5-5-5",
            Phase::Three => "3-3-3",
            Phase::One => "5-3-1",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5-5-5" | "5" | "fives" => Ok(Phase::Five),
            "3-3-3" | "3" | "threes" => Ok(Phase::Three),
            "5-3-1" | "1" | "ones" => Ok(Phase::One),
            _ => Err(format!(
                "Invalid phase '{}'. Valid options: 5-5-5, 3-3-3, 5-3-1",
                s
            )),
        }
    }
}

/// Per-lift completion tracker for the current training block.
///
/// The id is the owning lift's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: Uuid,
    pub five: bool,
    pub three: bool,
    pub one: bool,
}

/// Stored shape of a cycle, keyed by phase name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    #[serde(rename = "5-5-5")]
    pub five: bool,
    #[serde(rename = "3-3-3")]
    pub three: bool,
    #[serde(rename = "5-3-1")]
    pub one: bool,
}

impl Cycle {
    /// Creates a cycle with no phases completed.
    pub fn new(lift_id: Uuid) -> Self {
        Self {
            id: lift_id,
            five: false,
            three: false,
            one: false,
        }
    }

    pub fn from_record(id: Uuid, record: CycleRecord) -> Self {
        Self {
            id,
            five: record.five,
            three: record.three,
            one: record.one,
        }
    }

    pub fn to_record(&self) -> CycleRecord {
        CycleRecord {
            five: self.five,
            three: self.three,
            one: self.one,
        }
    }

    pub fn is_complete(&self, phase: Phase) -> bool {
        match phase {
            Phase::Five => self.five,
            Phase::Three => self.three,
            Phase::One => self.one,
        }
    }

    pub fn set_complete(&mut self, phase: Phase, complete: bool) {
        match phase {
            Phase::Five => self.five = complete,
            Phase::Three => self.three = complete,
            Phase::One => self.one = complete,
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks: Vec<String> = Phase::ALL
            .iter()
            .map(|phase| {
                let mark = if self.is_complete(*phase) { "x" } else { " " };
                format!("[{}] {}", mark, phase)
            })
            .collect();
        write!(f, "{}", marks.join("  "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(format!("{}", Phase::Five), "5-5-5");
        assert_eq!(format!("{}", Phase::Three), "3-3-3");
        assert_eq!(format!("{}", Phase::One), "5-3-1");
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!(Phase::from_str("5-5-5").unwrap(), Phase::Five);
        assert_eq!(Phase::from_str("3").unwrap(), Phase::Three);
        assert_eq!(Phase::from_str("5-3-1").unwrap(), Phase::One);
        assert!(Phase::from_str("warmup").is_err());
    }

    #[test]
    fn test_set_complete_touches_only_one_phase() {
        let mut cycle = Cycle::new(Uuid::new_v4());
        cycle.set_complete(Phase::Three, true);
        assert!(!cycle.is_complete(Phase::Five));
        assert!(cycle.is_complete(Phase::Three));
        assert!(!cycle.is_complete(Phase::One));
    }

    #[test]
    fn test_record_json_uses_phase_names() {
        let record = CycleRecord {
            five: true,
            three: false,
            one: false,
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"5-5-5": true, "3-3-3": false, "5-3-1": false})
        );
    }

    #[test]
    fn test_record_rejects_timestamp_values() {
        let result: Result<CycleRecord, _> = serde_json::from_str(
            r#"{"5-5-5":"2019-03-01T10:00:00.000Z","3-3-3":null,"5-3-1":null}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cycle_display() {
        let mut cycle = Cycle::new(Uuid::new_v4());
        cycle.set_complete(Phase::Five, true);
        assert_eq!(format!("{}", cycle), "[x] 5-5-5  [ ] 3-3-3  [ ] 5-3-1");
    }
}
