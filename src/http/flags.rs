//! Generic flag endpoints: `GET /flags`, `GET /flags/{name}`, `POST /flags`.

use axum::{extract::State, Json};

use crate::flags::FlagError;
use crate::http::request::{FlagName, FlagWrite, JsonBody};
use crate::http::response::{ApiError, FlagResponse, FlagsResponse};
use crate::http::server::AppState;

/// Every flag currently stored.
pub async fn list_flags(State(state): State<AppState>) -> Json<FlagsResponse> {
    Json(FlagsResponse::new(state.flags.all()))
}

/// A single flag by name; 404 if it was never written.
pub async fn get_flag(
    State(state): State<AppState>,
    FlagName(name): FlagName,
) -> Result<Json<FlagResponse>, ApiError> {
    let value = state.flags.get(&name)?;
    Ok(Json(FlagResponse::new(name, value)))
}

/// Create or overwrite a flag.
pub async fn upsert_flag(
    State(state): State<AppState>,
    JsonBody(write): JsonBody<FlagWrite>,
) -> Result<Json<FlagResponse>, ApiError> {
    let name = write.name().ok_or(FlagError::MissingName)?.to_string();
    let (name, value) = state.flags.set_flag(&name, write.into_value())?;
    Ok(Json(FlagResponse::new(name, value)))
}
