use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::metrics_middleware;

/// Liveness and metrics routes.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = create_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, handlers::LIVENESS_BODY);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_records_requests() {
        get_body("/").await;
        let (status, body) = get_body("/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hls_relay_http_requests_total"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, _) = get_body("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
