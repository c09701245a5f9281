//! Storage Port - Key-Value Persistence Interface
//!
//! The relay only ever sees this trait; whether bytes land on disk or
//! in a process-local map is decided once at startup and never changes
//! for the lifetime of the relay.

use std::fmt;

use async_trait::async_trait;

/// Which flavor of backend got bound at startup. Used for logging and
/// for tests asserting the selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// File-backed, survives process restarts.
    Durable,
    /// Process-local fallback, gone on exit.
    InMemory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable => f.write_str("durable"),
            Self::InMemory => f.write_str("in-memory"),
        }
    }
}

/// Trait for string-keyed storage providers.
///
/// Values are opaque strings; implementations must store and return
/// them unmodified. `get` on a key that was never written is
/// `Ok(None)`, not an error.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Check the backend can currently service requests.
    async fn is_healthy(&self) -> bool;

    /// Which flavor this backend is.
    fn kind(&self) -> BackendKind;
}
