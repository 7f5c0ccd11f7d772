//! HTTP client for the feature flag service.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::flags::{EnvironmentMode, FlagValue, Flags};

/// Environment variable naming the service base URL.
pub const BASE_URL_VAR: &str = "FEATURE_FLAG_URL";
/// Base URL used when `FEATURE_FLAG_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5005";
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors from talking to the service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Client for the flag service endpoints.
#[derive(Debug, Clone)]
pub struct FlagClient {
    client: Client,
    base_url: Url,
}

impl FlagClient {
    /// Create a client for `base_url` with the default 1 second timeout.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client for `base_url` with a custom timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Create a client from `FEATURE_FLAG_URL`, defaulting to
    /// `http://localhost:5005`.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The mode the service reports, or `test` if it cannot be determined
    /// for any reason (unreachable, non-2xx, garbage body, unknown mode).
    pub async fn current_mode(&self) -> EnvironmentMode {
        match self.fetch_mode().await {
            Ok(mode) => mode,
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to test mode");
                EnvironmentMode::Test
            }
        }
    }

    /// `GET /mode`, strictly: any failure is an error.
    pub async fn fetch_mode(&self) -> Result<EnvironmentMode, ClientError> {
        let body = self.get_json(&["mode"]).await?;
        parse_mode(&body)
    }

    /// `POST /mode`.
    pub async fn set_mode(&self, mode: &str) -> Result<EnvironmentMode, ClientError> {
        let url = self.endpoint(&["mode"])?;
        let response = self.client.post(url).json(&json!({ "mode": mode })).send().await?;
        let body = into_json(response).await?;
        parse_mode(&body)
    }

    /// `GET /health`, returned as received.
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json(&["health"]).await
    }

    /// `GET /flags`.
    pub async fn list_flags(&self) -> Result<Flags, ClientError> {
        let body = self.get_json(&["flags"]).await?;
        match body.get("flags") {
            Some(Value::Object(flags)) => Ok(flags.clone()),
            _ => Err(ClientError::Unexpected("missing 'flags' object".to_string())),
        }
    }

    /// `GET /flags/{name}`.
    pub async fn get_flag(&self, name: &str) -> Result<FlagValue, ClientError> {
        let body = self.get_json(&["flags", name]).await?;
        field(body, "value")
    }

    /// `POST /flags`. Returns the value as stored (normalized for
    /// `environment_mode`).
    pub async fn set_flag(&self, name: &str, value: FlagValue) -> Result<FlagValue, ClientError> {
        let url = self.endpoint(&["flags"])?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "name": name, "value": value }))
            .send()
            .await?;
        field(into_json(response).await?, "value")
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value, ClientError> {
        let url = self.endpoint(segments)?;
        let response = self.client.get(url).send().await?;
        into_json(response).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn into_json(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

fn field(mut body: Value, name: &str) -> Result<Value, ClientError> {
    body.get_mut(name)
        .map(Value::take)
        .ok_or_else(|| ClientError::Unexpected(format!("missing '{name}' field")))
}

fn parse_mode(body: &Value) -> Result<EnvironmentMode, ClientError> {
    let raw = body
        .get("mode")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::Unexpected("missing 'mode' field".to_string()))?;
    raw.parse()
        .map_err(|_| ClientError::Unexpected(format!("unknown mode '{raw}'")))
}
