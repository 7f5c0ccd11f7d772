//! Feature flag subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (name/value validation, environment_mode rules)
//!     → store.rs (generic name → JSON value map)
//!
//! Startup:
//!     ServiceConfig.flags.default_mode
//!     → mode.rs (parse, fall back to "test")
//!     → service.rs initialize() seeds environment_mode
//! ```
//!
//! # Design Decisions
//! - The store knows nothing about environment_mode; rules live in the service
//! - Flag values are opaque JSON, stored as received (except environment_mode)
//! - No delete operation: flags live for the process lifetime

pub mod mode;
pub mod service;
pub mod store;

pub use mode::{EnvironmentMode, UnknownMode, ENVIRONMENT_FLAG_NAME};
pub use service::{FlagError, FlagService};
pub use store::{FlagStore, FlagValue, Flags};
