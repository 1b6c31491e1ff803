//! Session middleware configuration.
//!
//! Sessions hold the visitor's Shopify cart id. Nothing else is stored
//! locally, so the in-memory store is enough; a restart only forgets which
//! cart a visitor had.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "uncmfrt_session";

/// Session expiry time in seconds (10 days, Shopify's cart lifetime).
const SESSION_EXPIRY_SECONDS: i64 = 10 * 24 * 60 * 60;

/// Keys for values stored in the session.
pub mod keys {
    /// Shopify cart id (`gid://shopify/Cart/...`).
    pub const CART_ID: &str = "cart_id";
}

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
