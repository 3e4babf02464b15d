//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Requests (outcomes, end-to-end duration, jobs in flight)
//! - Transcoding (attempts by mode, duration)
//! - Uploads (playlists and segments by result)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Request Metrics
// =============================================================================

/// Requests handled total by outcome.
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hls_relay_requests_total", "Total media requests handled"),
        &["outcome"], // "done", "done_with_caveat", "failed"
    )
    .unwrap()
});

/// Request failures total by stage.
pub static REQUEST_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "hls_relay_request_failures_total",
            "Total failed media requests",
        ),
        &["stage"],
    )
    .unwrap()
});

/// End-to-end request duration in seconds.
pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hls_relay_request_duration_seconds",
            "Duration of media requests from receipt to final status",
        )
        .buckets(vec![
            1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0,
        ]),
        &["outcome"],
    )
    .unwrap()
});

/// Requests currently past admission.
pub static JOBS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "hls_relay_jobs_in_flight",
        "Number of requests currently converting or uploading",
    )
    .unwrap()
});

// =============================================================================
// Transcoding Metrics
// =============================================================================

/// Transcoder runs total by mode and result.
pub static TRANSCODE_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hls_relay_transcode_attempts_total", "Total ffmpeg runs"),
        &["mode", "result"], // mode: "copy", "reencode"; result: "success", "failed"
    )
    .unwrap()
});

/// Transcoding duration in seconds, including any fallback.
pub static TRANSCODE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hls_relay_transcode_duration_seconds",
            "Duration of HLS conversion",
        )
        .buckets(vec![
            1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0,
        ]),
        &["attempts"],
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Uploads total by kind and result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hls_relay_uploads_total", "Total file uploads"),
        &["kind", "result"], // kind: "playlist", "segment", "original"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Requests
        Box::new(REQUESTS_TOTAL.clone()),
        Box::new(REQUEST_FAILURES.clone()),
        Box::new(REQUEST_DURATION.clone()),
        Box::new(JOBS_IN_FLIGHT.clone()),
        // Transcoding
        Box::new(TRANSCODE_ATTEMPTS.clone()),
        Box::new(TRANSCODE_DURATION.clone()),
        // Uploads
        Box::new(UPLOADS_TOTAL.clone()),
    ]
}

/// Label for a result.
pub(crate) fn result_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "failed"
    }
}
