//! Validation layer over the flag store.
//!
//! # Responsibilities
//! - Validate names and values before they reach the store
//! - Keep `environment_mode` present and holding a valid mode at all times
//! - Seed the store at startup (and again on demand, for test isolation)
//!
//! # Design Decisions
//! - Dispatch on key name, then delegate to the generic `FlagStore::set`
//! - Cheap to clone: handlers share one store through an `Arc`

use std::sync::Arc;

use thiserror::Error;

use crate::flags::mode::{EnvironmentMode, ENVIRONMENT_FLAG_NAME};
use crate::flags::store::{FlagStore, FlagValue, Flags};
use crate::observability::metrics;

/// Errors surfaced by flag reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Name missing, not a string, or blank.
    #[error("flag 'name' must be a non-empty string")]
    MissingName,

    /// Value missing or JSON `null`.
    #[error("flag 'value' must be provided")]
    MissingValue,

    /// Write to the reserved flag with a value outside the allowed modes.
    #[error("invalid mode; environment_mode must be 'test' or 'production'")]
    InvalidEnvironmentFlag,

    /// Mode change request with an unrecognised mode.
    #[error("invalid mode; must be 'test' or 'production'")]
    InvalidMode,

    /// No flag with this name has been written.
    #[error("flag '{0}' not found")]
    NotFound(String),
}

/// Flag store plus the rules every write must satisfy.
#[derive(Debug, Clone)]
pub struct FlagService {
    store: Arc<FlagStore>,
    default_mode: EnvironmentMode,
}

impl FlagService {
    /// Create a service with a fresh store seeded with `default_mode`.
    pub fn new(default_mode: EnvironmentMode) -> Self {
        let service = Self {
            store: Arc::new(FlagStore::new()),
            default_mode,
        };
        service.initialize();
        service
    }

    /// Reset the store to its startup state: only `environment_mode`, set to
    /// the configured default.
    pub fn initialize(&self) {
        self.store.reset([(
            ENVIRONMENT_FLAG_NAME.to_string(),
            FlagValue::from(self.default_mode),
        )]);
        tracing::debug!(mode = %self.default_mode, "Flag store initialized");
    }

    pub fn default_mode(&self) -> EnvironmentMode {
        self.default_mode
    }

    /// Look up a single flag.
    pub fn get(&self, name: &str) -> Result<FlagValue, FlagError> {
        self.store
            .get(name)
            .ok_or_else(|| FlagError::NotFound(name.to_string()))
    }

    /// Snapshot of every flag.
    pub fn all(&self) -> Flags {
        self.store.snapshot()
    }

    /// Current environment mode. Falls back to `test` should the reserved
    /// key ever be missing or malformed.
    pub fn mode(&self) -> EnvironmentMode {
        self.store
            .get(ENVIRONMENT_FLAG_NAME)
            .as_ref()
            .and_then(FlagValue::as_str)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(EnvironmentMode::Test)
    }

    /// Create or overwrite a flag.
    ///
    /// The name is trimmed before use. Writes to `environment_mode` are
    /// normalized to the lowercase mode string. Returns the stored name and
    /// value.
    pub fn set_flag(&self, name: &str, value: FlagValue) -> Result<(String, FlagValue), FlagError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FlagError::MissingName);
        }
        if value.is_null() {
            return Err(FlagError::MissingValue);
        }

        let value = if name == ENVIRONMENT_FLAG_NAME {
            let mode: EnvironmentMode = mode_text(&value)
                .parse()
                .map_err(|_| FlagError::InvalidEnvironmentFlag)?;
            FlagValue::from(mode)
        } else {
            value
        };

        self.store.set(name, value.clone());
        metrics::record_flag_write(name == ENVIRONMENT_FLAG_NAME);
        tracing::info!(flag = %name, "Flag updated");

        Ok((name.to_string(), value))
    }

    /// Switch the environment mode. Input is trimmed and case-insensitive.
    pub fn set_mode(&self, raw: &str) -> Result<EnvironmentMode, FlagError> {
        let mode: EnvironmentMode = raw.trim().parse().map_err(|_| FlagError::InvalidMode)?;

        let previous = self.mode();
        self.store.set(ENVIRONMENT_FLAG_NAME, FlagValue::from(mode));
        metrics::record_flag_write(true);
        tracing::info!(from = %previous, to = %mode, "Environment mode changed");

        Ok(mode)
    }
}

impl Default for FlagService {
    fn default() -> Self {
        Self::new(EnvironmentMode::default())
    }
}

/// Text form of a value for mode comparison: strings as-is, everything else
/// as its JSON text.
fn mode_text(value: &FlagValue) -> String {
    match value {
        FlagValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
