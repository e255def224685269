//! Stored schema versioning.
//!
//! Version 1 data predates the version marker: cycle phases hold either the
//! completion timestamp or `null`. Version 2 stores plain booleans. The
//! upgrade is one way and runs when a repository is opened.

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::models::{CycleRecord, Phase};
use crate::storage::{Table, TableMap, TableStore};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 2;

/// Blob key holding the stored schema version.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Reads the stored schema version. `None` means pre-versioned data.
pub async fn stored_version(tables: &TableStore) -> Result<Option<u32>> {
    let Some(raw) = tables.blobs().get(SCHEMA_VERSION_KEY).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::CorruptStorage {
            table: SCHEMA_VERSION_KEY,
            source,
        })
}

/// Brings stored data up to [`SCHEMA_VERSION`]. Returns the version found.
pub async fn migrate(tables: &TableStore) -> Result<Option<u32>> {
    let found = stored_version(tables).await?;
    match found {
        Some(version) if version > SCHEMA_VERSION => {
            return Err(StoreError::UnsupportedSchema {
                found: version,
                supported: SCHEMA_VERSION,
            })
        }
        Some(version) if version == SCHEMA_VERSION => return Ok(found),
        _ => {}
    }

    let converted = upgrade_cycles(tables).await?;
    tables
        .blobs()
        .set(SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_string())
        .await?;
    tracing::info!(
        from = found.unwrap_or(1),
        to = SCHEMA_VERSION,
        cycles = converted,
        "migrated stored data"
    );
    Ok(found)
}

// Rewrites legacy cycle rows in place. Returns the number of rows written.
async fn upgrade_cycles(tables: &TableStore) -> Result<usize> {
    let legacy: TableMap<Map<String, Value>> = tables.load(Table::Cycles).await?;
    if legacy.is_empty() {
        return Ok(0);
    }

    let mut upgraded = TableMap::new();
    for (id, row) in legacy {
        let done = |phase: Phase| {
            phase_done(row.get(phase.name())).ok_or_else(|| StoreError::CorruptStorage {
                table: Table::Cycles.key(),
                source: <serde_json::Error as serde::de::Error>::custom(format!(
                    "cycle {id} has an unreadable {phase} value"
                )),
            })
        };
        let record = CycleRecord {
            five: done(Phase::Five)?,
            three: done(Phase::Three)?,
            one: done(Phase::One)?,
        };
        upgraded.insert(id, record);
    }

    let count = upgraded.len();
    tables.save(Table::Cycles, &upgraded).await?;
    Ok(count)
}

// A timestamp or any other marker means done; null or missing means not yet.
fn phase_done(value: Option<&Value>) -> Option<bool> {
    match value {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(done)) => Some(*done),
        Some(Value::String(_)) | Some(Value::Number(_)) => Some(true),
        Some(_) => None,
    }
}
