//! Metrics collection and exposition.
//!
//! # Metrics
//! - `colorapp_requests_total` (counter): requests by service, route, status
//! - `colorapp_request_duration_seconds` (histogram): handler latency
//! - `gateway_upstream_fetch_total` (counter): colorteller fetches by outcome
//! - `gateway_history_entries` (gauge): non-empty slots in the rolling history
//! - `colorteller_injected_faults_total` (counter): faults by kind

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Parse and install the metrics endpoint if an address is configured.
pub fn init_from_config(metrics_address: Option<&str>) {
    let Some(raw) = metrics_address else {
        return;
    };
    match raw.parse() {
        Ok(addr) => init_metrics(addr),
        Err(_) => tracing::error!(metrics_address = %raw, "Failed to parse metrics address"),
    }
}

/// Record one handled request.
pub fn record_request(service: &'static str, route: &'static str, status: u16, start: Instant) {
    counter!(
        "colorapp_requests_total",
        "service" => service,
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "colorapp_request_duration_seconds",
        "service" => service,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one colorteller fetch.
pub fn record_fetch(outcome: &'static str) {
    counter!("gateway_upstream_fetch_total", "outcome" => outcome).increment(1);
}

pub fn record_history_entries(entries: usize) {
    gauge!("gateway_history_entries").set(entries as f64);
}

pub fn record_injected_fault(kind: &'static str) {
    counter!("colorteller_injected_faults_total", "kind" => kind).increment(1);
}
