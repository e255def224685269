use std::sync::Arc;

use liftlog_core::{BlobStore, FileBlobStore, Repository, SqliteBlobStore};

use crate::config::{Backend, Config};

/// Database file name used by the sqlite backend
pub const DB_FILE_NAME: &str = "liftlog.db";

/// Open the configured backend and bring its data up to date
pub async fn open_repository(config: &Config) -> Result<Repository, Box<dyn std::error::Error>> {
    let data_dir = &config.data_dir.value;
    let blobs: Arc<dyn BlobStore> = match config.backend.value {
        Backend::File => Arc::new(FileBlobStore::new(data_dir)),
        Backend::Sqlite => Arc::new(SqliteBlobStore::open(&data_dir.join(DB_FILE_NAME)).await?),
    };
    tracing::debug!(
        backend = %config.backend.value,
        data_dir = %data_dir.display(),
        "opening store"
    );

    Ok(Repository::open(blobs).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue};
    use liftlog_core::{Increment, Lift, LiftRecord, Round};
    use std::path::Path;
    use tempfile::tempdir;

    fn config_for(dir: &Path, backend: Backend) -> Config {
        let missing = dir.join("nonexistent.yaml");
        let mut config = Config::load_with_env(Some(missing), |_| None).unwrap();
        config.data_dir = ConfigValue::new(dir.join("data"), ConfigSource::File);
        config.backend = ConfigValue::new(backend, ConfigSource::File);
        config
    }

    #[tokio::test]
    async fn test_open_repository_persists_for_each_backend() {
        for backend in [Backend::File, Backend::Sqlite] {
            let temp_dir = tempdir().unwrap();
            let config = config_for(temp_dir.path(), backend);

            let repo = open_repository(&config).await.unwrap();
            let (lift, _) = repo
                .create_lift(LiftRecord::new("press", 95.0, Increment::Five, Round::Five))
                .await
                .unwrap();
            drop(repo);

            let reopened = open_repository(&config).await.unwrap();
            let stored: Lift = reopened.get(lift.id).await.unwrap();
            assert_eq!(stored, lift);
        }
    }

    #[tokio::test]
    async fn test_backend_file_layout() {
        let temp_dir = tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");

        open_repository(&config_for(temp_dir.path(), Backend::Sqlite))
            .await
            .unwrap();
        assert!(data_dir.join(DB_FILE_NAME).exists());

        let repo = open_repository(&config_for(temp_dir.path(), Backend::File))
            .await
            .unwrap();
        repo.create_lift(LiftRecord::new("row", 135.0, Increment::Five, Round::Five))
            .await
            .unwrap();
        assert!(data_dir.join("lifts.json").exists());
        assert!(data_dir.join("cycles.json").exists());
        assert!(data_dir.join("schema_version.json").exists());
    }
}
