//! Liveness and fallback handlers.

use axum::{extract::State, Json};

use crate::http::response::{ApiError, HealthResponse};
use crate::http::server::AppState;

/// GET /health. Never fails.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.flags.mode()))
}

/// Any method/path the router does not serve.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::endpoint_not_found()
}
