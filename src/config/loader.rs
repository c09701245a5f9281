//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters, and
//! providing clear error messages for misconfiguration.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::AppConfig;

/// Errors the configuration layer can surface.
///
/// Typed so startup code can tell a missing file apart from a file
/// that parsed but fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for `AppConfig`.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// The config parsed but violates a validation rule.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns [`ConfigError`] if the file doesn't exist or can't be
/// read, TOML parsing fails, or validation rules are violated.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content =
        std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    info!(
        service = %config.service.name,
        key = %config.store.key,
        data_dir = %config.store.data_dir,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// The storage key must be path-safe because the durable backend
/// derives file names from it.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.service.name.is_empty() {
        return Err(ConfigError::Invalid(
            "service.name must not be empty".to_string(),
        ));
    }

    if config.store.key.is_empty() {
        return Err(ConfigError::Invalid(
            "store.key must not be empty".to_string(),
        ));
    }
    if !config
        .store
        .key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ConfigError::Invalid(format!(
            "store.key {:?} contains characters unsafe for file names",
            config.store.key
        )));
    }

    if config.store.data_dir.is_empty() {
        return Err(ConfigError::Invalid(
            "store.data_dir must not be empty".to_string(),
        ));
    }

    if config.store.channel_capacity == 0 {
        return Err(ConfigError::Invalid(
            "store.channel_capacity must be positive".to_string(),
        ));
    }

    Ok(())
}
