//! Error types for the entity store.

use thiserror::Error;

/// Errors surfaced by the blob store, table store and repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lookup by id found nothing.
    #[error("No {kind} found for {id}")]
    NotFound { kind: &'static str, id: String },

    /// Stored data for a table could not be parsed into its record schema.
    #[error("Corrupt data in table '{table}': {source}")]
    CorruptStorage {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A record references a lift that does not exist.
    #[error("{kind} {id} references missing lift {lift_id}")]
    OrphanReference {
        kind: &'static str,
        id: String,
        lift_id: String,
    },

    /// Caller-supplied values outside their allowed domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The stored schema is newer than this build understands.
    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidInput(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
