//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Define the JSON bodies the service returns
//! - Map domain errors to HTTP status codes
//!
//! # Design Decisions
//! - Every body starts with `status`; field order follows struct order
//! - Errors always use the `{status: "error", message}` envelope, never plain text

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::flags::{EnvironmentMode, FlagError, FlagValue, Flags};

/// Name reported by `/health`.
pub const SERVICE_NAME: &str = "feature-flag";

/// Outcome marker leading every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Status,
    pub service: &'static str,
    pub mode: EnvironmentMode,
}

impl HealthResponse {
    pub fn new(mode: EnvironmentMode) -> Self {
        Self {
            status: Status::Ok,
            service: SERVICE_NAME,
            mode,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlagsResponse {
    pub status: Status,
    pub flags: Flags,
}

impl FlagsResponse {
    pub fn new(flags: Flags) -> Self {
        Self {
            status: Status::Ok,
            flags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlagResponse {
    pub status: Status,
    pub name: String,
    pub value: FlagValue,
}

impl FlagResponse {
    pub fn new(name: impl Into<String>, value: FlagValue) -> Self {
        Self {
            status: Status::Ok,
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub status: Status,
    pub mode: EnvironmentMode,
}

impl ModeResponse {
    pub fn new(mode: EnvironmentMode) -> Self {
        Self {
            status: Status::Ok,
            mode,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

/// Error returned from handlers and extractors.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// No route for this method and path.
    pub fn endpoint_not_found() -> Self {
        Self::not_found("endpoint not found")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FlagError> for ApiError {
    fn from(err: FlagError) -> Self {
        match err {
            FlagError::NotFound(_) => Self::not_found(err.to_string()),
            FlagError::MissingName
            | FlagError::MissingValue
            | FlagError::InvalidEnvironmentFlag
            | FlagError::InvalidMode => {
                tracing::debug!(error = %err, "Rejected flag write");
                Self::bad_request(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                status: Status::Error,
                message: self.message,
            }),
        )
            .into_response()
    }
}
