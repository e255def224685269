//! Whole-table load and save on top of a blob store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BlobStore, Table};
use crate::error::{Result, StoreError};

/// A table snapshot: record keyed by entity id.
pub type TableMap<R> = BTreeMap<String, R>;

/// Presents each table as one JSON object stored under the table's key.
#[derive(Clone)]
pub struct TableStore {
    blobs: Arc<dyn BlobStore>,
}

impl TableStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Returns the underlying blob store.
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// Loads a full table.
    ///
    /// An absent blob is an empty table. A blob that does not parse into the
    /// record schema is reported as [`StoreError::CorruptStorage`] and never
    /// replaced with an empty table.
    pub async fn load<R: DeserializeOwned>(&self, table: Table) -> Result<TableMap<R>> {
        let Some(json) = self.blobs.get(table.key()).await? else {
            tracing::debug!(table = table.key(), "table absent, starting empty");
            return Ok(TableMap::new());
        };

        let rows: TableMap<R> =
            serde_json::from_str(&json).map_err(|source| StoreError::CorruptStorage {
                table: table.key(),
                source,
            })?;
        tracing::debug!(table = table.key(), rows = rows.len(), "loaded table");
        Ok(rows)
    }

    /// Serializes the full table and replaces the stored blob in one write.
    pub async fn save<R: Serialize>(&self, table: Table, rows: &TableMap<R>) -> Result<()> {
        let json = serde_json::to_string(rows).map_err(|e| {
            StoreError::invalid(format!("cannot serialize table '{}': {e}", table.key()))
        })?;
        self.blobs.set(table.key(), &json).await?;
        tracing::debug!(table = table.key(), rows = rows.len(), "saved table");
        Ok(())
    }
}
