//! Metrics collection and exposition.
//!
//! # Metrics
//! - `backend_requests_total` (counter): requests by method and status
//! - `backend_request_duration_seconds` (histogram): latency distribution
//! - `backend_rate_limited_total` (counter): admissions rejected, by scope
//! - `backend_cors_rejected_total` (counter): cross-origin rejections
//! - `backend_mail_failures_total` (counter): acknowledgment sends failed

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "backend_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("backend_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(scope: &'static str) {
    counter!("backend_rate_limited_total", "scope" => scope).increment(1);
}

pub fn record_cors_rejected() {
    counter!("backend_cors_rejected_total").increment(1);
}

pub fn record_mail_failure() {
    counter!("backend_mail_failures_total").increment(1);
}
