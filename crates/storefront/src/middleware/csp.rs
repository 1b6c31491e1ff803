//! CSP nonce middleware for inline script protection.
//!
//! Generates a unique, cryptographically random nonce per request. The home
//! page's deferred chunk carries an inline swap script, so the nonce must
//! be known both to the template and to the `Content-Security-Policy`
//! header built in [`content_security_policy`].

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Third-party origins the storefront loads scripts from.
const SCRIPT_ORIGINS: &str = "https://cdn.shopify.com \
    https://cdn-static.okendo.io \
    https://surveys.okendo.io \
    https://api.okendo.io";

/// Origins for images (Shopify CDN, design assets, review widget).
const IMAGE_ORIGINS: &str = "https://cdn.shopify.com \
    https://s3-alpha-sig.figma.com \
    https://cdn-static.okendo.io \
    https://surveys.okendo.io";

/// Origins for hero and podcast video.
const MEDIA_ORIGINS: &str = "https://cdn.shopify.com \
    https://s3-figma-videos-production-sig.figma.com";

/// A CSP nonce value for inline scripts.
///
/// Each request gets a unique, cryptographically random nonce (128-bit, base64-encoded).
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Get the nonce value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Build the `Content-Security-Policy` header value for a request.
///
/// Inline scripts are allowed only with `nonce`. Inline styles stay allowed
/// because article HTML from Shopify carries `style` attributes.
#[must_use]
pub fn content_security_policy(nonce: &str) -> String {
    format!(
        "default-src 'self'; \
         script-src 'self' 'nonce-{nonce}' {SCRIPT_ORIGINS}; \
         style-src 'self' 'unsafe-inline' https://cdn-static.okendo.io https://fonts.googleapis.com; \
         font-src 'self' https://fonts.gstatic.com https://cdn.shopify.com https://cdn-static.okendo.io; \
         img-src 'self' data: {IMAGE_ORIGINS}; \
         media-src 'self' {MEDIA_ORIGINS}; \
         connect-src 'self' https://api.okendo.io https://cdn-static.okendo.io https://monorail-edge.shopifysvc.com; \
         frame-src https://www.google.com https://s3-figma-videos-production-sig.figma.com; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Middleware that generates a CSP nonce and stores it in request extensions.
///
/// Must be added before `security_headers_middleware` in the middleware stack
/// so the nonce is available when building the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

/// Extractor to get the CSP nonce from request extensions.
///
/// # Example
///
/// ```ignore
/// async fn handler(CspNonce(nonce): CspNonce) -> impl IntoResponse {
///     MyTemplate { nonce, /* ... */ }
/// }
/// ```
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "CSP nonce not found in request extensions - middleware may be misconfigured"
            );
            Self(String::new())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_unique_and_encoded() {
        let a = CspNonce::generate();
        let b = CspNonce::generate();

        assert_ne!(a.value(), b.value());
        // 16 bytes -> 24 base64 characters with padding
        assert_eq!(a.value().len(), 24);
        assert!(STANDARD.decode(a.value()).is_ok());
    }

    #[test]
    fn test_policy_allows_only_nonced_inline_scripts() {
        let policy = content_security_policy("abc123");

        assert!(policy.contains("script-src 'self' 'nonce-abc123' https://cdn.shopify.com"));
        assert!(!policy.contains("script-src 'self' 'unsafe-inline'"));
        assert!(policy.contains("object-src 'none'"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_policy_allows_storefront_media() {
        let policy = content_security_policy("n");

        assert!(policy.contains("img-src 'self' data: https://cdn.shopify.com"));
        assert!(policy.contains("media-src 'self' https://cdn.shopify.com"));
    }
}
