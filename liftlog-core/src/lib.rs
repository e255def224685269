//! Liftlog Core Library
//!
//! Lifts, cycles and logs for 5/3/1 training, the workout planner, and the
//! key-value backed store they live in.

pub mod error;
pub mod models;
pub mod plan;
pub mod progression;
pub mod repository;
pub mod schema;
pub mod state;
pub mod storage;

pub use error::{Result, StoreError};
pub use models::{
    Cycle, CycleRecord, Increment, Lift, LiftChanges, LiftRecord, Log, LogRecord, NewLog, Phase,
    Round,
};
pub use plan::{Movement, Plates, Workout};
pub use repository::{Entity, Repository};
pub use state::{reduce, Action, State};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, SqliteBlobStore, Table};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
