//! Request logging.

use axum::body::HttpBody;
use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Log one line per request with method, path, status, size, duration and
/// client address.
///
/// The client address is only known when the server is started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    let bytes = body_size(&response);

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        bytes,
        duration_ms = started.elapsed().as_millis() as u64,
        client_addr = %client_addr,
        "request completed"
    );

    response
}

/// Body length when it is known up front; streamed bodies count as zero.
fn body_size(response: &Response) -> u64 {
    response.body().size_hint().exact().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{middleware, Json, Router};
    use serde_json::json;
    use tower::ServiceExt;

    #[test]
    fn test_body_size_of_json_response() {
        let payload = json!({ "message": "Song updated successfully" });
        let expected = serde_json::to_vec(&payload).unwrap().len() as u64;

        let response = Json(payload).into_response();

        assert!(response.headers().get("content-length").is_none());
        assert_eq!(body_size(&response), expected);
    }

    #[test]
    fn test_body_size_of_empty_response() {
        let response = StatusCode::NO_CONTENT.into_response();
        assert_eq!(body_size(&response), 0);
    }

    #[tokio::test]
    async fn test_log_requests_passes_response_through() {
        let app = Router::new()
            .route("/", get(|| async { "Welcome" }))
            .layer(middleware::from_fn(log_requests));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_size(&response), "Welcome".len() as u64);
    }
}
