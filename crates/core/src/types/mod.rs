//! Core types for the UNCMFRT storefront.
//!
//! This module provides type-safe wrappers for the few domain concepts the
//! storefront computes with rather than passes through.

pub mod cart;
pub mod price;

pub use cart::{LineState, MutationId, Quantity, QuantityTargets};
pub use price::{CurrencyCode, Price, PriceError};
