//! Configuration Module - TOML-based Relay Configuration
//!
//! Loads and validates configuration from `config.toml`. The storage
//! key and data directory are externalized here - nothing is
//! hardcoded in the relay itself.

pub mod loader;

use serde::Deserialize;

pub use loader::{ConfigError, load_config};

/// Top-level relay configuration.
///
/// Loaded from `config.toml` at startup and validated before any
/// backend is bound.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Service identity and logging.
    pub service: ServiceConfig,
    /// Storage key, data directory, and channel sizing.
    pub store: StoreConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Human-readable service name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// The single record slot everything persists under.
    #[serde(default = "default_store_key")]
    pub key: String,
    /// Directory for the durable backend's files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Capacity of the inbound request channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_key() -> String {
    "progrissStore".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_channel_capacity() -> usize {
    64
}
