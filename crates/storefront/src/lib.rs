//! UNCMFRT Storefront library.
//!
//! The storefront renders the UNCMFRT home page from Shopify data and owns
//! the cart's quantity controls. It is a library so the router can be
//! exercised in tests against a mock Storefront API.
//!
//! # Modules
//!
//! - [`home`] - home page data loading, deferred recommendations, carousels
//! - [`routes`] - axum handlers and the application router
//! - [`shopify`] - Storefront API client and domain types
//! - [`cart_session`] - cart id and in-flight line mutations in the session
//! - [`middleware`] - request ids, CSP nonces, security headers, sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_session;
pub mod config;
pub mod error;
pub mod filters;
pub mod home;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
