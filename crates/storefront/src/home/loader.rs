//! Home page data loader.
//!
//! Required data (the bundles collection) fails the request when Shopify
//! cannot answer. Optional data (recommendations, blog feeds) is logged and
//! replaced by an empty or absent value so the page still renders.

use std::future::Future;

use tracing::instrument;

use crate::home::blogs::{BlogFeed, fetch_filtered_blogs};
use crate::home::deferred::Deferred;
use crate::shopify::types::{Blog, Product};
use crate::shopify::{ShopifyError, StorefrontClient};

/// The storefront queries the home page issues.
///
/// Implemented by [`StorefrontClient`]; tests substitute an in-memory fake.
pub trait StorefrontQuery: Clone + Send + Sync + 'static {
    /// Recently updated products for the trending carousel.
    fn recommended_products(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send;

    /// Products of the bundles collection.
    fn bundles_collection(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send;

    /// The first `first` blogs with up to `articles_first` articles each.
    fn blogs(
        &self,
        first: i64,
        articles_first: i64,
    ) -> impl Future<Output = Result<Vec<Blog>, ShopifyError>> + Send;
}

impl StorefrontQuery for StorefrontClient {
    fn recommended_products(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send {
        Self::recommended_products(self)
    }

    fn bundles_collection(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send {
        Self::bundles_collection(self)
    }

    fn blogs(
        &self,
        first: i64,
        articles_first: i64,
    ) -> impl Future<Output = Result<Vec<Blog>, ShopifyError>> + Send {
        Self::blogs(self, first, articles_first)
    }
}

/// Everything the home page renders from Shopify.
#[derive(Debug)]
pub struct HomeData {
    /// Bundles collection products, resolved before rendering.
    pub bundles: Vec<Product>,
    /// Recommended products, still being fetched.
    ///
    /// Resolves to `None` when the query failed.
    pub recommended_products: Deferred<Vec<Product>>,
    /// The "Balanced Diet" blog feed.
    pub balanced_diet_blogs: Vec<Blog>,
    /// The "Podcasts" blog feed.
    pub podcast_blogs: Vec<Blog>,
}

/// Load the home page data.
///
/// The recommended products query starts first and is not awaited. The
/// bundles query and the two blog feeds are awaited in sequence.
///
/// # Errors
///
/// Returns an error if the bundles collection cannot be fetched. The
/// in-flight recommendations task is aborted in that case.
#[instrument(skip(storefront))]
pub async fn load_home_data<S: StorefrontQuery>(
    storefront: &S,
) -> Result<HomeData, ShopifyError> {
    let recommended_products = load_deferred_data(storefront);
    let bundles = required(storefront.bundles_collection().await, "bundles collection")?;

    let balanced_diet_blogs = fetch_filtered_blogs(storefront, BlogFeed::BalancedDiet).await;
    let podcast_blogs = fetch_filtered_blogs(storefront, BlogFeed::Podcasts).await;

    Ok(HomeData {
        bundles,
        recommended_products,
        balanced_diet_blogs,
        podcast_blogs,
    })
}

/// Start the below-the-fold query without waiting for it.
fn load_deferred_data<S: StorefrontQuery>(storefront: &S) -> Deferred<Vec<Product>> {
    let storefront = storefront.clone();
    Deferred::spawn(async move {
        optional(
            storefront.recommended_products().await,
            "recommended products",
        )
    })
}

/// Pass a required result through, logging the failure.
pub(crate) fn required<T>(
    result: Result<T, ShopifyError>,
    what: &str,
) -> Result<T, ShopifyError> {
    result.inspect_err(|e| tracing::error!(error = %e, "Failed to fetch {what}"))
}

/// Turn an optional result into an `Option`, logging the failure.
pub(crate) fn optional<T>(result: Result<T, ShopifyError>, what: &str) -> Option<T> {
    result
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch {what}"))
        .ok()
}
