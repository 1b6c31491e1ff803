//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the request span)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP built from the nonce)
//! 6. Session layer (tower-sessions with the in-memory store)

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
