//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Answer unknown paths and methods with the JSON 404 envelope
//! - Serve on a listener until the shutdown signal fires

use std::future::Future;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::flags::FlagService;
use crate::http::flags::{get_flag, list_flags, upsert_flag};
use crate::http::health::{endpoint_not_found, health};
use crate::http::mode::{get_mode, set_mode};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flags: FlagService,
}

/// HTTP server for the feature flag service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    flags: FlagService,
}

impl HttpServer {
    /// Create a server with a fresh flag store seeded from `config`.
    pub fn new(config: ServiceConfig) -> Self {
        let flags = FlagService::new(config.default_mode());
        Self::with_flags(config, flags)
    }

    /// Create a server around an existing flag service.
    pub fn with_flags(config: ServiceConfig, flags: FlagService) -> Self {
        let state = AppState {
            flags: flags.clone(),
        };
        let router = build_router(&config, state);
        Self {
            router,
            config,
            flags,
        }
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.flags.mode(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the flag store this server serves.
    pub fn flags(&self) -> &FlagService {
        &self.flags
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/health", get(health).fallback(endpoint_not_found))
        .route(
            "/flags",
            get(list_flags).post(upsert_flag).fallback(endpoint_not_found),
        )
        .route("/flags/{name}", get(get_flag).fallback(endpoint_not_found))
        .route(
            "/mode",
            get(get_mode).post(set_mode).fallback(endpoint_not_found),
        )
        .fallback(endpoint_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
}
