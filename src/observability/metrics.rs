//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vendor_portal_requests_total` (counter): requests by method, status
//! - `vendor_portal_request_duration_seconds` (histogram): latency distribution
//! - `vendor_portal_rate_limited_total` (counter): denials by endpoint
//! - `vendor_portal_logins_total` (counter): login attempts by outcome
//! - `vendor_portal_vendor_mutations_total` (counter): writes by action
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "vendor_portal_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("vendor_portal_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(endpoint: &str) {
    counter!("vendor_portal_rate_limited_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!("vendor_portal_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_vendor_mutation(action: &'static str) {
    counter!("vendor_portal_vendor_mutations_total", "action" => action).increment(1);
}

/// Middleware recording count and latency for every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
