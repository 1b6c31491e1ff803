//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (streamed)
//! GET  /health                 - Health check
//! GET  /static/*               - Static assets
//!
//! # Cart (fragments for enhanced forms, redirects otherwise)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set line quantity, 0 removes (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Redirect to Shopify checkout
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header::CACHE_CONTROL},
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::middleware::{
    create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
const STATIC_DIR: &str = "crates/storefront/static";

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
}

/// Build the full application: routes, static files and the middleware stack.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
        .service(ServeDir::new(STATIC_DIR));

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Shopify.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use axum::{
        http::{StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;
    use wiremock::MockServer;

    use super::*;
    use crate::config::tests::test_config;
    use crate::shopify::StorefrontClient;

    /// App state whose Storefront client talks to `server`.
    pub(crate) fn state_for(server: &MockServer) -> AppState {
        let config = test_config();
        let storefront = StorefrontClient::with_endpoint(
            &config.shopify,
            format!("{}/api/2026-01/graphql.json", server.uri()),
        );
        AppState::with_storefront(config, storefront)
    }

    /// Collect a response body, streamed or not.
    pub(crate) async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let response = router(state_for(&server))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = MockServer::start().await;
        let response = router(state_for(&server))
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
