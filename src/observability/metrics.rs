//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shop_requests_total` (counter): requests by operation, status
//! - `shop_request_duration_seconds` (histogram): latency by operation
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - Prometheus endpoint only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one handled request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "shop_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("shop_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
