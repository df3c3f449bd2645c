//! Metrics collection and exposition.
//!
//! # Metrics
//! - `subresource_cache_lookups_total` (counter): resolved-route cache lookups by result
//! - `subresource_cache_entries` (gauge): cached route tables
//! - `subresource_dispatch_total` (counter): locator dispatch rounds by outcome
//! - `subresource_requests_total` (counter): HTTP requests by method, status
//! - `subresource_request_duration_seconds` (histogram): request latency
//!
//! # Design Decisions
//! - Recording is a no-op until [`init_metrics`] installs the exporter
//! - Label sets are small and bounded; unknown methods are recorded as `other`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("subresource_cache_lookups_total", "result" => result).increment(1);
}

/// Record the number of cached tables.
pub fn record_cache_size(size: usize) {
    metrics::gauge!("subresource_cache_entries").set(size as f64);
}

/// Record one locator dispatch round.
pub fn record_dispatch(outcome: &'static str) {
    metrics::counter!("subresource_dispatch_total", "outcome" => outcome).increment(1);
}

/// Label for an HTTP method. Extension methods share the `other` label.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

/// Record a finished HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "subresource_requests_total",
        "method" => method_label(method),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("subresource_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_buckets_extensions() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("PATCH"), "PATCH");
        assert_eq!(method_label("PURGE"), "other");
        assert_eq!(method_label("get"), "other");
    }
}
