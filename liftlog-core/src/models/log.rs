use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::plan::one_rep_max;

/// A single performed set. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: Uuid,
    pub lift_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: f64,
    pub reps: u32,
    /// One-rep-max estimate computed when the set was logged.
    pub orm: f64,
}

/// Stored shape of a log; the id is the table key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub lift_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: f64,
    pub reps: u32,
    pub orm: f64,
}

/// A performed set as entered by the user, before the estimate is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLog {
    pub lift_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: f64,
    pub reps: u32,
}

impl NewLog {
    pub fn new(lift_id: Uuid, weight: f64, reps: u32) -> Self {
        Self {
            lift_id,
            date: Utc::now(),
            weight,
            reps,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(StoreError::invalid(format!(
                "logged weight must be a positive number, got {}",
                self.weight
            )));
        }
        if self.reps == 0 {
            return Err(StoreError::invalid("logged reps must be at least 1"));
        }
        Ok(())
    }

    /// Builds the stored record, fixing the one-rep-max estimate now.
    pub fn into_record(self) -> LogRecord {
        LogRecord {
            lift_id: self.lift_id,
            date: self.date,
            weight: self.weight,
            reps: self.reps,
            orm: one_rep_max(self.weight, self.reps),
        }
    }
}

impl Log {
    pub fn from_record(id: Uuid, record: LogRecord) -> Self {
        Self {
            id,
            lift_id: record.lift_id,
            date: record.date,
            weight: record.weight,
            reps: record.reps,
            orm: record.orm,
        }
    }

    pub fn to_record(&self) -> LogRecord {
        LogRecord {
            lift_id: self.lift_id,
            date: self.date,
            weight: self.weight,
            reps: self.reps,
            orm: self.orm,
        }
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {} x {}  (est. 1RM {})",
            self.date.format("%Y-%m-%d %H:%M"),
            self.weight,
            self.reps,
            self.orm
        )
    }
}
