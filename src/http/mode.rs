//! Environment mode convenience endpoints: `GET /mode`, `POST /mode`.
//!
//! Both read and write the reserved `environment_mode` flag, so `/mode` and
//! `/flags/environment_mode` always agree.

use axum::{extract::State, Json};

use crate::http::request::{JsonBody, ModeWrite};
use crate::http::response::{ApiError, ModeResponse};
use crate::http::server::AppState;

pub async fn get_mode(State(state): State<AppState>) -> Json<ModeResponse> {
    Json(ModeResponse::new(state.flags.mode()))
}

pub async fn set_mode(
    State(state): State<AppState>,
    JsonBody(write): JsonBody<ModeWrite>,
) -> Result<Json<ModeResponse>, ApiError> {
    let mode = state.flags.set_mode(&write.mode_text())?;
    Ok(Json(ModeResponse::new(mode)))
}
