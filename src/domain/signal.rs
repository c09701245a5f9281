//! Signal Types - Requests In, Completion Out
//!
//! The application talks to the relay exclusively through these types.
//! The stored payload is an opaque serialized string; the relay never
//! parses it, so `StoredValue` deliberately exposes no structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque serialized application state.
///
/// Whatever the application serializes is what gets stored and what
/// comes back, byte for byte. Transparent serde so the value nests
/// into JSON logs and fixtures without an extra wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredValue(String);

impl StoredValue {
    /// Wrap a serialized payload.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw payload.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inbound request from the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    /// Save this serialized state under the configured key.
    Persist(StoredValue),
    /// Read the configured key and reply with `LoadCompleted` if present.
    Load,
}

/// Outbound event to the application.
///
/// Emitted only when a stored value exists; an empty store stays silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A previously persisted value was found.
    LoadCompleted(StoredValue),
}
