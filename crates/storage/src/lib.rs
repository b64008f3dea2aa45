use async_trait::async_trait;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

use shared::domain::RatingTable;

pub const DEFAULT_DATA_FILE: &str = "drink_data.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read rating snapshot '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write rating snapshot '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("rating snapshot '{}' is not a valid table: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode rating table: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("data file '{0}' must be a bare file name inside the checkout")]
    InvalidFileName(String),
}

/// Wholesale persistence of the rating table.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Returns the persisted table, or an empty one when nothing has been saved yet.
    async fn load(&self) -> Result<RatingTable, StoreError>;

    /// Replaces the persisted snapshot with `table`.
    async fn save(&self, table: &RatingTable) -> Result<(), StoreError>;

    /// Location of the persisted snapshot; this is what gets committed.
    fn artifact_path(&self) -> &Path;
}

/// JSON snapshot on the local filesystem, usually inside the synced checkout.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot named `data_file` directly inside `repo_path`.
    ///
    /// A blank name falls back to [`DEFAULT_DATA_FILE`]. Names with path
    /// separators, `.` or `..` are rejected so the snapshot cannot leave the
    /// checkout.
    pub fn in_repo(repo_path: impl AsRef<Path>, data_file: &str) -> Result<Self, StoreError> {
        let data_file = match data_file.trim() {
            "" => DEFAULT_DATA_FILE,
            name => name,
        };
        if data_file.contains(['/', '\\']) || data_file == "." || data_file == ".." {
            return Err(StoreError::InvalidFileName(data_file.to_string()));
        }
        Ok(Self::new(repo_path.as_ref().join(data_file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir_exists(&self) -> Result<(), StoreError> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })
    }
}

#[async_trait]
impl RatingStore for FileStore {
    async fn load(&self) -> Result<RatingTable, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no rating snapshot yet; starting empty");
                return Ok(RatingTable::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table: RatingTable =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), rows = table.len(), "loaded rating snapshot");
        Ok(table)
    }

    async fn save(&self, table: &RatingTable) -> Result<(), StoreError> {
        self.ensure_parent_dir_exists().await?;

        let mut encoded = serde_json::to_vec_pretty(table)?;
        encoded.push(b'\n');

        // Write beside the target and rename so readers never see a partial file.
        let staging = self.staging_path();
        tokio::fs::write(&staging, &encoded)
            .await
            .map_err(|source| StoreError::Write {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), rows = table.len(), "saved rating snapshot");
        Ok(())
    }

    fn artifact_path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
