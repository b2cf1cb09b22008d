//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): HTTP requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency by method
//! - `gateway_translations_total` (counter): translations by endpoint, outcome
//! - `gateway_handler_invocations_total` (counter): legacy handler calls by endpoint
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus exporter is optional and off the request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_translation(endpoint: &str, outcome: &'static str) {
    metrics::counter!(
        "gateway_translations_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_handler_invocation(endpoint: &str) {
    metrics::counter!("gateway_handler_invocations_total", "endpoint" => endpoint.to_string())
        .increment(1);
}
