//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` (CDN, load balancer) or generates a
//! UUID v4. The id is recorded on the `TraceLayer` span (declared with an
//! empty `request_id` field in `main.rs`), tagged on the Sentry scope and
//! echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// A usable id from the incoming headers, if any.
fn upstream_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_ID_LEN)
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn(request_id_middleware))
    }

    async fn response_id(header: Option<&str>) -> String {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_upstream_id_is_echoed() {
        assert_eq!(response_id(Some("cf-ray-1234")).await, "cf-ray-1234");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let id = response_id(None).await;
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_oversized_id_is_replaced() {
        let long = "x".repeat(MAX_UPSTREAM_ID_LEN + 1);
        let id = response_id(Some(&long)).await;
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
