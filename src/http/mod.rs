//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routing)
//!     → request.rs (request ID, JSON body extraction)
//!     → health.rs / flags.rs / mode.rs (handlers over FlagService)
//!     → response.rs (JSON envelope, error mapping)
//!     → Send to client
//! ```

pub mod flags;
pub mod health;
pub mod mode;
pub mod request;
pub mod response;
pub mod server;

pub use request::{FlagName, FlagWrite, JsonBody, ModeWrite, RequestBody, UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, Status, SERVICE_NAME};
pub use server::{build_router, AppState, HttpServer};
