//! Shopify Storefront API client implementation.
//!
//! Posts hand-written GraphQL documents with `reqwest` 0.13. Responses are
//! never cached: every request sees Shopify's current catalog and cart.

mod conversions;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::{Blog, Cart, CartLineInput, CartLineUpdateInput, Product};

use conversions::{convert_blog, convert_cart, convert_product_card, user_errors_to_error};
use queries::{
    AddCartLines, AddCartLinesVariables, BUNDLES_COLLECTION_HANDLE, Blogs, BlogsVariables,
    BundlesCollection, BundlesCollectionVariables, CartInput, CartMutationPayload, CartVariables,
    CreateCart, CreateCartVariables, GetCart, InContext, RecommendedProducts, RemoveCartLines,
    RemoveCartLinesVariables, UpdateCartLines, UpdateCartLinesVariables,
};

/// Header carrying the server-side access token.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Maximum characters of a response body copied into logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    context: InContext,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Create a client that posts to an explicit endpoint (e.g., a mock server).
    #[must_use]
    pub fn with_endpoint(config: &ShopifyStorefrontConfig, endpoint: String) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.clone(),
                context: InContext {
                    country: config.country.clone(),
                    language: config.language.clone(),
                },
            }),
        }
    }

    fn context(&self) -> InContext {
        self.inner.context.clone()
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(PRIVATE_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first so failures can log what Shopify actually sent
        let response_text = response.text().await?;
        let preview = || response_text.chars().take(BODY_PREVIEW_CHARS).collect::<String>();

        if !status.is_success() {
            tracing::error!(
                operation,
                status = %status,
                body = %preview(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!("HTTP {status}: {}", preview())));
        }

        let response: Response<Q::ResponseData> = serde_json::from_str(&response_text)
            .map_err(|e| {
                tracing::error!(
                    operation,
                    error = %e,
                    body = %preview(),
                    "Failed to parse Shopify GraphQL response"
                );
                ShopifyError::Parse(e)
            })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(operation, errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(Into::into).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation,
                body = %preview(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Home Page Methods
    // =========================================================================

    /// Most recently updated products (up to 100).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn recommended_products(&self) -> Result<Vec<Product>, ShopifyError> {
        let data = self.execute::<RecommendedProducts>(self.context()).await?;
        Ok(data
            .products
            .nodes
            .into_iter()
            .map(convert_product_card)
            .collect())
    }

    /// Products of the bundles collection.
    ///
    /// A missing collection yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn bundles_collection(&self) -> Result<Vec<Product>, ShopifyError> {
        let variables = BundlesCollectionVariables {
            handle: BUNDLES_COLLECTION_HANDLE.to_string(),
            context: self.context(),
        };
        let data = self.execute::<BundlesCollection>(variables).await?;
        Ok(data
            .collection
            .map(|collection| {
                collection
                    .products
                    .nodes
                    .into_iter()
                    .map(convert_product_card)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// The first `first` blogs, each with up to `articles_first` articles.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn blogs(&self, first: i64, articles_first: i64) -> Result<Vec<Blog>, ShopifyError> {
        let variables = BlogsVariables {
            first,
            articles_first,
            context: self.context(),
        };
        let data = self.execute::<Blogs>(variables).await?;
        Ok(data.blogs.nodes.into_iter().map(convert_blog).collect())
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ShopifyError> {
        let variables = CartVariables {
            cart_id: cart_id.to_string(),
            context: self.context(),
        };

        let data = self.execute::<GetCart>(variables).await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Create a new cart holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = CreateCartVariables {
            input: CartInput { lines },
            context: self.context(),
        };
        let data = self.execute::<CreateCart>(variables).await?;
        cart_from_payload(data.cart_create, "create cart")
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = AddCartLinesVariables {
            cart_id: cart_id.to_string(),
            lines,
            context: self.context(),
        };
        let data = self.execute::<AddCartLines>(variables).await?;
        cart_from_payload(data.cart_lines_add, "add cart lines")
    }

    /// Set new quantities on existing lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = UpdateCartLinesVariables {
            cart_id: cart_id.to_string(),
            lines,
            context: self.context(),
        };
        let data = self.execute::<UpdateCartLines>(variables).await?;
        cart_from_payload(data.cart_lines_update, "update cart lines")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn remove_cart_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = RemoveCartLinesVariables {
            cart_id: cart_id.to_string(),
            line_ids,
            context: self.context(),
        };
        let data = self.execute::<RemoveCartLines>(variables).await?;
        cart_from_payload(data.cart_lines_remove, "remove cart lines")
    }
}

/// Unwrap a cart mutation payload, surfacing user errors first.
fn cart_from_payload(
    payload: Option<CartMutationPayload>,
    action: &str,
) -> Result<Cart, ShopifyError> {
    let Some(payload) = payload else {
        return Err(ShopifyError::message(format!("Failed to {action}")));
    };

    if let Some(err) = user_errors_to_error(payload.user_errors) {
        return Err(err);
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or_else(|| ShopifyError::message(format!("Failed to {action}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::tests::test_config;

    async fn client_for(server: &MockServer) -> StorefrontClient {
        StorefrontClient::with_endpoint(
            &test_config().shopify,
            format!("{}/api/2026-01/graphql.json", server.uri()),
        )
    }

    fn product_card(id: u32, handle: &str) -> serde_json::Value {
        json!({
            "id": format!("gid://shopify/Product/{id}"),
            "title": handle,
            "handle": handle,
            "priceRange": { "minVariantPrice": { "amount": "49.0", "currencyCode": "USD" } },
            "images": { "nodes": [] },
            "variants": { "nodes": [{ "id": format!("gid://shopify/ProductVariant/{id}"), "availableForSale": true }] },
            "okendoStarRatingSnippet": null
        })
    }

    #[tokio::test]
    async fn test_bundles_collection_sends_operation_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2026-01/graphql.json"))
            .and(header(PRIVATE_TOKEN_HEADER, "private"))
            .and(body_partial_json(json!({
                "operationName": "BundlesCollection",
                "variables": { "handle": "Sleep", "country": "US", "language": "EN" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "collection": {
                    "id": "gid://shopify/Collection/1",
                    "title": "Sleep",
                    "products": { "nodes": [product_card(1, "night-cap"), product_card(2, "deep-rest")] }
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = client_for(&server).await.bundles_collection().await.unwrap();

        let handles: Vec<_> = products.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles, ["night-cap", "deep-rest"]);
    }

    #[tokio::test]
    async fn test_missing_bundles_collection_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": null } })),
            )
            .mount(&server)
            .await;

        let products = client_for(&server).await.bundles_collection().await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_blogs_passes_article_bound() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "operationName": "Blogs",
                "variables": { "first": 3, "articlesFirst": 100 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "blogs": { "nodes": [{
                    "id": "gid://shopify/Blog/1",
                    "title": "Podcasts",
                    "handle": "podcasts",
                    "articles": { "nodes": [] }
                }] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let blogs = client_for(&server).await.blogs(3, 100).await.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs.first().unwrap().title, "Podcasts");
    }

    #[tokio::test]
    async fn test_graphql_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "Throttled", "path": ["products"] }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .recommended_products()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Throttled path: products");
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .recommended_products()
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyError::RateLimited(4)));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.bundles_collection().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_remove_cart_lines_user_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "operationName": "RemoveCartLines",
                "variables": { "lineIds": ["gid://shopify/CartLine/1"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "cartLinesRemove": {
                    "cart": null,
                    "userErrors": [{ "field": ["lineIds"], "message": "not found" }]
                } }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .remove_cart_lines("gid://shopify/Cart/1", vec!["gid://shopify/CartLine/1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(ref msg) if msg == "lineIds: not found"));
    }

    #[tokio::test]
    async fn test_get_cart_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "cart": null } })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .get_cart("gid://shopify/Cart/gone")
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyError::NotFound(_)));
    }
}
