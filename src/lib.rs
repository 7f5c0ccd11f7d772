//! In-memory feature flag service with a reserved, enum-constrained
//! `environment_mode` flag.

pub mod client;
pub mod config;
pub mod flags;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use flags::{EnvironmentMode, FlagService};
pub use http::HttpServer;
