//! The environment mode enum and its reserved flag name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved flag name holding the current environment mode.
pub const ENVIRONMENT_FLAG_NAME: &str = "environment_mode";

/// Mode the surrounding system runs in.
///
/// Parsing is case-insensitive; the stored and serialized form is always
/// lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Test,
    Production,
}

/// Returned when a string is neither `test` nor `production`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown environment mode '{0}', expected 'test' or 'production'")]
pub struct UnknownMode(pub String);

impl EnvironmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentMode::Test => "test",
            EnvironmentMode::Production => "production",
        }
    }

    /// Resolve a configured default, falling back to `test` for anything
    /// that is not a recognised mode.
    pub fn resolve_default(raw: &str) -> Self {
        match raw.parse() {
            Ok(mode) => mode,
            Err(UnknownMode(value)) => {
                tracing::warn!(
                    configured = %value,
                    fallback = %EnvironmentMode::Test,
                    "Unrecognised default environment mode"
                );
                EnvironmentMode::Test
            }
        }
    }
}

impl FromStr for EnvironmentMode {
    type Err = UnknownMode;

    /// Case-insensitive, but whitespace is significant; callers trim when
    /// their contract says so.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(EnvironmentMode::Test),
            "production" => Ok(EnvironmentMode::Production),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EnvironmentMode> for serde_json::Value {
    fn from(mode: EnvironmentMode) -> Self {
        serde_json::Value::String(mode.as_str().to_string())
    }
}
