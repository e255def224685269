//! Persistent storage for liftlog.
//!
//! All state lives in a flat, string-keyed blob store. On top of it the
//! [`TableStore`] keeps one JSON object per table, keyed by entity id:
//! - `lifts`: Map of lift_id -> Lift record
//! - `cycles`: Map of lift_id -> Cycle record
//! - `logs`: Map of log_id -> Log record
//!
//! Three blob store backends are provided: an in-memory map, a directory of
//! JSON files, and a single SQLite table.

mod file;
mod memory;
mod sqlite;
mod table;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;
pub use table::{TableMap, TableStore};

/// A flat, string-keyed, string-valued persistent map.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Named tables kept in the blob store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Lifts,
    Cycles,
    Logs,
}

impl Table {
    /// Returns the blob store key for this table.
    pub fn key(&self) -> &'static str {
        match self {
            Table::Lifts => "lifts",
            Table::Cycles => "cycles",
            Table::Logs => "logs",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
