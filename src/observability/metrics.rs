//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feature_flag_requests_total` (counter): requests by method, route, status
//! - `feature_flag_request_duration_seconds` (histogram): latency distribution
//! - `feature_flag_writes_total` (counter): successful flag writes, by kind
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Route label is the matched route template, never the raw path, so flag
//!   names do not become label values

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "feature_flag_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "feature_flag_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a successful flag write.
pub fn record_flag_write(environment_mode: bool) {
    let kind = if environment_mode { "environment_mode" } else { "generic" };
    metrics::counter!("feature_flag_writes_total", "kind" => kind).increment(1);
}

/// Middleware timing every request through the router.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
