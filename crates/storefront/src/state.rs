//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart_session::PendingRegistry;
use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds configuration, the
/// Storefront API client and the registry of cart lines with a mutation in
/// flight, which is the only mutable state shared between requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    pending: PendingRegistry,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        Self::with_storefront(config, storefront)
    }

    /// Create application state around an existing client (e.g., one pointed
    /// at a mock server).
    #[must_use]
    pub fn with_storefront(config: StorefrontConfig, storefront: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                pending: PendingRegistry::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Cart lines with a mutation waiting on Shopify.
    #[must_use]
    pub fn pending(&self) -> &PendingRegistry {
        &self.inner.pending
    }
}
