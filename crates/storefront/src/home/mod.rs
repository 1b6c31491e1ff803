//! Home page data loading and composition.
//!
//! The home page mixes data Shopify must answer before the first byte
//! (bundles, blog feeds) with data that may arrive later in the stream
//! (recommended products). This module owns that split; `routes::home`
//! turns the resulting [`HomeData`] into a streamed response.
//!
//! # Components
//!
//! - [`loader`] - issues the queries and builds the [`HomeData`] envelope
//! - [`deferred`] - a handle to a value still being fetched
//! - [`blogs`] - per-feed blog queries filtered by title
//! - [`carousel`] - slider presets handed to the carousel widget
//! - [`sections`] - the fixed order of page sections

pub mod blogs;
pub mod carousel;
pub mod deferred;
pub mod loader;
pub mod sections;

#[cfg(test)]
pub(crate) mod fixtures;

pub use blogs::{BlogFeed, fetch_filtered_blogs, filter_blogs_by_title};
pub use carousel::{CarouselPresets, CarouselSettings};
pub use deferred::Deferred;
pub use loader::{HomeData, StorefrontQuery, load_home_data};
pub use sections::HomeSection;
