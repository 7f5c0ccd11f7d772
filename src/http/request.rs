//! Request handling: request IDs and JSON body extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Parse JSON bodies, answering malformed ones with the service's error envelope
//! - Decode flag names from the path, tolerating invalid UTF-8
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Bodies must be JSON objects; anything else is a malformed request
//! - Field-level checks (missing name, null value) belong to the flag service

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, HeaderValue},
    Json,
};
use percent_encoding::percent_decode_str;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// A JSON request body type, with the message returned when the body is
/// missing or malformed.
pub trait RequestBody: DeserializeOwned {
    const EXPECTED: &'static str;
}

/// Extractor for a JSON object body of type `T`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: RequestBody + Send,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(request, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Malformed request body");
                ApiError::bad_request(T::EXPECTED)
            })?;

        if !value.is_object() {
            tracing::debug!("Request body is not a JSON object");
            return Err(ApiError::bad_request(T::EXPECTED));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|_| ApiError::bad_request(T::EXPECTED))
    }
}

/// Flag name taken from the last path segment.
///
/// Segments that do not decode to UTF-8 are decoded lossily, so lookups of
/// such names end in the usual JSON 404 instead of a plain-text rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagName(pub String);

impl<S> FromRequestParts<S> for FlagName
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(name)) => Ok(FlagName(name)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Decoding flag name lossily");
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                Ok(FlagName(percent_decode_str(raw).decode_utf8_lossy().into_owned()))
            }
        }
    }
}

/// Body of `POST /flags`.
///
/// Both fields are kept loose so that a wrong type is reported as a
/// validation error on that field, not as a malformed body.
#[derive(Debug, Default, Deserialize)]
pub struct FlagWrite {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl FlagWrite {
    /// The name, if it is a JSON string. Numbers and other non-strings are
    /// treated as missing rather than coerced to text.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    /// The value; missing and `null` both come back as `Value::Null`.
    pub fn into_value(self) -> Value {
        self.value.unwrap_or(Value::Null)
    }
}

impl RequestBody for FlagWrite {
    const EXPECTED: &'static str = "expected JSON body with 'name' and 'value' fields";
}

/// Body of `POST /mode`.
#[derive(Debug, Default, Deserialize)]
pub struct ModeWrite {
    #[serde(default)]
    pub mode: Option<Value>,
}

impl ModeWrite {
    /// Text to parse as a mode. Non-string values use their JSON text;
    /// a missing mode is the empty string.
    pub fn mode_text(&self) -> String {
        match &self.mode {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

impl RequestBody for ModeWrite {
    const EXPECTED: &'static str = "expected JSON body with a 'mode' field";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_write_null_is_missing() {
        let write: FlagWrite = serde_json::from_value(json!({"name": "a", "value": null})).unwrap();
        assert_eq!(write.name(), Some("a"));
        assert!(write.into_value().is_null());
    }

    #[test]
    fn test_flag_write_non_string_name() {
        let write: FlagWrite = serde_json::from_value(json!({"name": 7, "value": 1})).unwrap();
        assert_eq!(write.name(), None);
    }

    #[test]
    fn test_mode_text() {
        let write: ModeWrite = serde_json::from_value(json!({"mode": " Test "})).unwrap();
        assert_eq!(write.mode_text(), " Test ");

        let write: ModeWrite = serde_json::from_value(json!({"mode": true})).unwrap();
        assert_eq!(write.mode_text(), "true");

        let write: ModeWrite = serde_json::from_value(json!({})).unwrap();
        assert_eq!(write.mode_text(), "");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let request = axum::http::Request::new(());
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
