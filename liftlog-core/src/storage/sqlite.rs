//! Blob storage backed by a single SQLite table.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::BlobStore;
use crate::error::Result;

/// Stores blobs as rows of `blobs(key, value)`.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    pool: SqlitePool,
}

impl SqliteBlobStore {
    /// Opens (creating if needed) the database at `path` and runs migrations.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", path.display());
        let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

        // One connection: writes are issued sequentially by a single process.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying the blob table migration.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blobs (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_blob_table() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("data").join("liftlog.db");

        let store = SqliteBlobStore::open(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%'",
        )
        .fetch_all(&store.pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(names, vec!["blobs"]);
    }

    #[tokio::test]
    async fn test_get_set_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteBlobStore::open(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        assert!(store.get("lifts").await.unwrap().is_none());

        store.set("lifts", "{}").await.unwrap();
        store.set("lifts", "{\"x\":{}}").await.unwrap();

        assert_eq!(
            store.get("lifts").await.unwrap().as_deref(),
            Some("{\"x\":{}}")
        );
    }

    #[tokio::test]
    async fn test_values_persist_across_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let store = SqliteBlobStore::open(&db_path).await.unwrap();
            store.set("cycles", "{}").await.unwrap();
            store.pool.close().await;
        }

        let store = SqliteBlobStore::open(&db_path).await.unwrap();
        assert_eq!(store.get("cycles").await.unwrap().as_deref(), Some("{}"));
    }
}
