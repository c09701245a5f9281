//! Memory Backend - In-Process Fallback Store
//!
//! Degraded-mode stand-in for the durable backend: a plain map behind
//! an async lock. Values live only as long as the process. Selected
//! only when the file backend cannot bind its data directory.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::storage::{BackendKind, StorageBackend};

/// Process-local key-value store with the same contract as the
/// durable backend, minus persistence across restarts.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    fn kind(&self) -> BackendKind {
        BackendKind::InMemory
    }
}
