//! Feature flag service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace, timeout, body limit, metrics)
//!                         │
//!                         ▼
//!                     http::{health, flags, mode} handlers
//!                         │
//!                         ▼
//!                     flags::FlagService (validation, environment_mode rules)
//!                         │
//!                         ▼
//!                     flags::FlagStore (in-memory name → JSON value)
//! ```
//!
//! Configuration comes from defaults, an optional TOML file
//! (`FEATURE_FLAG_CONFIG`) and the `FEATURE_FLAG_DEFAULT_MODE` /
//! `FEATURE_FLAG_PORT` environment variables.

use feature_flag::config;
use feature_flag::lifecycle::startup;
use feature_flag::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability);
    tracing::info!("feature-flag v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
