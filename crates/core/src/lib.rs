//! UNCMFRT Core - Shared types library.
//!
//! This crate provides the types the storefront passes between its data
//! loading and rendering layers:
//! - cart line quantities and the targets offered by quantity controls
//! - the confirmed/pending state tag carried by every cart line
//! - prices parsed from Storefront API money amounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and easy to test in isolation.
//!
//! # Modules
//!
//! - [`types`] - Quantities, line states, mutation ids and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
