//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Path to an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "FEATURE_FLAG_CONFIG";
/// Initial environment mode.
pub const DEFAULT_MODE_VAR: &str = "FEATURE_FLAG_DEFAULT_MODE";
/// Listen port.
pub const PORT_VAR: &str = "FEATURE_FLAG_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("FEATURE_FLAG_PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration the way the service binary does: defaults, then the
/// file named by `FEATURE_FLAG_CONFIG` (if set), then environment overrides.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`], reading variables through `lookup`.
pub fn load_with<F>(lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
        Some(path) => read_config_file(Path::new(&path))?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay `FEATURE_FLAG_DEFAULT_MODE` and `FEATURE_FLAG_PORT` onto `config`.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(mode) = lookup(DEFAULT_MODE_VAR) {
        config.flags.default_mode = mode;
    }

    if let Some(port) = lookup(PORT_VAR) {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
    }

    Ok(())
}

fn read_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServiceConfig = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}
