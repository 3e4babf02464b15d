//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the relay process:
//! - HTTP request metrics for the liveness endpoint
//! - Bot update counts by kind
//! - Pipeline, transcoder and upload metrics from the core crate

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hls_relay_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hls_relay_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

// =============================================================================
// Bot Metrics
// =============================================================================

/// Telegram updates handled, by kind (command, media, unsupported).
pub static BOT_UPDATES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hls_relay_bot_updates_total", "Telegram updates handled"),
        &["kind"],
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(BOT_UPDATES_TOTAL.clone()))
        .unwrap();

    // Core metrics (pipeline, transcoder, uploads)
    for metric in hls_relay_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("hls_relay_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        BOT_UPDATES_TOTAL.with_label_values(&["media"]).inc();
        hls_relay_core::metrics::REQUESTS_TOTAL
            .with_label_values(&["done"])
            .inc();
        hls_relay_core::metrics::JOBS_IN_FLIGHT.set(0);

        let output = encode_metrics();
        assert!(output.contains("hls_relay_bot_updates_total"));
        assert!(output.contains("hls_relay_requests_total"));
        assert!(output.contains("hls_relay_jobs_in_flight"));
    }
}
