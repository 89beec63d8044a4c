//! Metrics definitions for connection resolution.
//!
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`. Without an installed
//! recorder every call here is a no-op.

use metrics::{counter, describe_counter};

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "connections_resolved_total",
        "Total number of connection queries resolved"
    );
    describe_counter!(
        "edges_returned_total",
        "Total number of edges returned by connection queries"
    );
    describe_counter!(
        "cursors_rejected_total",
        "Total number of before/after cursors that failed to decode and were ignored"
    );
}

/// Record a resolved connection and the number of edges it returned.
///
/// # Arguments
/// * `collection` - The collection name
/// * `edges` - Number of edges in the page
pub fn record_connection_resolved(collection: &str, edges: usize) {
    counter!("connections_resolved_total", "collection" => collection.to_string()).increment(1);
    counter!("edges_returned_total", "collection" => collection.to_string())
        .increment(edges as u64);
}

/// Record a cursor argument that could not be decoded.
///
/// # Arguments
/// * `argument` - The argument name ("before" or "after")
pub fn record_cursor_rejected(argument: &'static str) {
    counter!("cursors_rejected_total", "argument" => argument).increment(1);
}
