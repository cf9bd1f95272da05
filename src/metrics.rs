//! Prometheus metrics for structuring and pricing passes.
//!
//! This module provides metrics for:
//! - Exchange fetch latency
//! - Triangle structuring latency and counts
//! - Pricing coverage

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, info};

// === Metric Name Constants ===

/// Exchange fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "fetch_latency_ms";
/// Triangle structuring latency metric name.
pub const METRIC_STRUCTURE_LATENCY: &str = "structure_latency_ms";
/// Pairs loaded counter metric name.
pub const METRIC_PAIRS_LOADED: &str = "pairs_loaded_total";
/// Raw triangles counter metric name.
pub const METRIC_RAW_TRIANGLES: &str = "raw_triangles_total";
/// Unique triangles counter metric name.
pub const METRIC_UNIQUE_TRIANGLES: &str = "unique_triangles_total";
/// Priced triangles counter metric name.
pub const METRIC_TRIANGLES_PRICED: &str = "triangles_priced_total";
/// Triangles priced with at least one missing leg.
pub const METRIC_TRIANGLES_INCOMPLETE: &str = "triangles_incomplete_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Exchange REST fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STRUCTURE_LATENCY,
        "Time to enumerate, deduplicate and format triangles in milliseconds"
    );

    describe_counter!(METRIC_PAIRS_LOADED, "Total number of tradeable pairs loaded");
    describe_counter!(
        METRIC_RAW_TRIANGLES,
        "Total number of raw (duplicated) triangles enumerated"
    );
    describe_counter!(
        METRIC_UNIQUE_TRIANGLES,
        "Total number of unique triangles after deduplication"
    );
    describe_counter!(METRIC_TRIANGLES_PRICED, "Total number of triangles priced");
    describe_counter!(
        METRIC_TRIANGLES_INCOMPLETE,
        "Total number of triangles priced with a missing leg quote"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on `0.0.0.0:port`. Needs a running tokio runtime.
pub fn install_exporter(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record exchange fetch latency.
pub fn record_fetch_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FETCH_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Record triangle structuring latency.
pub fn record_structure_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_STRUCTURE_LATENCY).record(latency_ms);
}

/// Record the size of each structuring stage.
pub fn record_structure_counts(pairs: usize, raw: usize, unique: usize) {
    counter!(METRIC_PAIRS_LOADED).increment(pairs as u64);
    counter!(METRIC_RAW_TRIANGLES).increment(raw as u64);
    counter!(METRIC_UNIQUE_TRIANGLES).increment(unique as u64);
}

/// Increment priced triangle counters.
pub fn inc_triangles_priced(complete: bool) {
    counter!(METRIC_TRIANGLES_PRICED).increment(1);
    if !complete {
        counter!(METRIC_TRIANGLES_INCOMPLETE).increment(1);
    }
}
