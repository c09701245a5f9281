//! Storage Adapters - Concrete Backends and Selection Policy
//!
//! Two implementations of the `StorageBackend` port: `FileBackend`
//! (durable, atomic writes) and `MemoryBackend` (process-local
//! fallback). `select_backend` picks one at startup; the choice is
//! final for the process lifetime.

pub mod file;
pub mod memory;

use std::sync::Arc;

use tracing::{info, warn};

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::config::StoreConfig;
use crate::ports::storage::StorageBackend;

/// Bind a storage backend for the process lifetime.
///
/// Prefers the durable file backend; if its data directory cannot be
/// created or written, degrades to the in-memory fallback. Degraded
/// mode means no persistence across restarts; embedders that need
/// durability should treat the warning below as actionable.
pub async fn select_backend(config: &StoreConfig) -> Arc<dyn StorageBackend> {
    match FileBackend::new(&config.data_dir).await {
        Ok(backend) => {
            info!(data_dir = %config.data_dir, "Durable storage bound");
            Arc::new(backend)
        }
        Err(e) => {
            warn!(
                data_dir = %config.data_dir,
                error = %format!("{e:#}"),
                "Durable storage unavailable, falling back to in-memory backend"
            );
            Arc::new(MemoryBackend::new())
        }
    }
}
