//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome
//! - `router_dispatch_duration_seconds` (histogram): time spent in the chain
//! - `router_recovered_faults_total` (counter): handler panics contained
//! - `router_context_pool_created` (gauge): contexts ever constructed by the pool
//!
//! # Design Decisions
//! - Outcome labels are a closed set of static strings
//! - No per-path labels: path cardinality is unbounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(outcome: &'static str, started: Instant) {
    counter!("router_dispatch_total", "outcome" => outcome).increment(1);
    histogram!("router_dispatch_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_recovered_fault() {
    counter!("router_recovered_faults_total").increment(1);
}

pub fn record_pool_created(total: usize) {
    gauge!("router_context_pool_created").set(total as f64);
}
