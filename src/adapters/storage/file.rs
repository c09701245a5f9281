//! File Backend - Atomic Per-Key File Storage
//!
//! Stores each key as one file under a data directory using atomic
//! writes (write to tmp file, then rename). The file is always either
//! the old or the new value, never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::ports::storage::{BackendKind, StorageBackend};

/// Durable key-value store backed by one file per key.
///
/// Construction probes the data directory for writability so that
/// backend selection fails fast instead of surfacing the first error
/// on a persist request.
pub struct FileBackend {
    /// Directory holding one `<key>.store` file per key.
    data_dir: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at `data_dir`.
    ///
    /// Creates the directory if it doesn't exist and verifies it is
    /// writable by writing and removing a probe file.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        let probe = dir.join(".write-probe");
        fs::write(&probe, b"")
            .await
            .context("Data directory is not writable")?;
        fs::remove_file(&probe)
            .await
            .context("Failed to remove write probe")?;

        Ok(Self {
            data_dir: dir.to_path_buf(),
        })
    }

    /// Final path for a key. Keys are validated as path-safe by the
    /// config layer before a backend ever sees them.
    fn value_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.store"))
    }

    /// Sibling tmp path for atomic writes.
    fn tmp_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.store.tmp"))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No stored value");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read stored value from {}", path.display())
            }),
        }
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let tmp = self.tmp_path(key);
        let path = self.value_path(key);

        // Write to tmp file
        fs::write(&tmp, value)
            .await
            .context("Failed to write tmp value file")?;

        // Atomic rename
        fs::rename(&tmp, &path)
            .await
            .context("Failed to rename value file")?;

        debug!(key, bytes = value.len(), "Value stored");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        fs::metadata(&self.data_dir).await.is_ok()
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Durable
    }
}
