use axum::http::header;
use axum::response::IntoResponse;

use crate::metrics::encode_metrics;

/// Body returned by the liveness endpoint.
pub const LIVENESS_BODY: &str = "HLS Bot Running";

pub async fn liveness() -> &'static str {
    LIVENESS_BODY
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
