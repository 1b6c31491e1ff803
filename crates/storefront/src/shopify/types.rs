//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean API separate from the raw response shapes in
//! `storefront::queries`. They are created per request and dropped once the
//! response has been rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uncmfrt_core::{LineState, Price, Quantity};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Format for display (e.g., "$49.00").
    ///
    /// Falls back to `amount code` for currencies the core crate does not know.
    #[must_use]
    pub fn display(&self) -> String {
        Price::parse(&self.amount, &self.currency_code).map_or_else(
            |_| format!("{} {}", self.amount, self.currency_code),
            |price| price.to_string(),
        )
    }
}

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
}

// =============================================================================
// Image Types
// =============================================================================

/// Product, article or cart line image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<String>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product variant, reduced to what add-to-cart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID (merchandise id for cart lines).
    pub id: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
}

/// A product card as shown in carousels and grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Product images in platform order.
    pub images: Vec<Image>,
    /// Product variants in platform order.
    pub variants: Vec<ProductVariant>,
    /// Pre-rendered star rating snippet from the reviews app metafield.
    pub star_rating_snippet: Option<String>,
}

impl Product {
    /// First image, if any.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }

    /// First variant, used by add-to-cart buttons.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }
}

// =============================================================================
// Blog Types
// =============================================================================

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Article ID.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Rendered HTML body.
    pub content_html: String,
    /// Short excerpt.
    pub excerpt: Option<String>,
    /// Publish timestamp.
    pub published_at: DateTime<Utc>,
    /// Author display name.
    pub author_name: Option<String>,
    /// Article image.
    pub image: Option<Image>,
}

/// A blog and its articles in platform order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Blog ID.
    pub id: String,
    /// Blog title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// Articles in platform order.
    pub articles: Vec<Article>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Selected option on a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Flavor").
    pub name: String,
    /// Selected value (e.g., "Vanilla").
    pub value: String,
}

/// Product reference on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    /// Product ID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
}

/// Merchandise (variant) on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Variant image.
    pub image: Option<Image>,
    /// Parent product.
    pub product: CartMerchandiseProduct,
    /// Options that identify the variant.
    pub selected_options: Vec<SelectedOption>,
}

/// A line in a cart.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Line ID.
    pub id: String,
    /// Number of units.
    pub quantity: Quantity,
    /// Whether Shopify has confirmed the last mutation against this line.
    pub state: LineState,
    /// Variant on this line.
    pub merchandise: CartMerchandise,
    /// Line total.
    pub total_amount: Money,
}

/// A shopping cart.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Cart ID.
    pub id: String,
    /// Shopify checkout URL.
    pub checkout_url: String,
    /// Sum of line quantities.
    pub total_quantity: Quantity,
    /// Subtotal before taxes and shipping.
    pub subtotal: Money,
    /// Cart lines.
    pub lines: Vec<CartLine>,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant to add.
    pub merchandise_id: String,
    /// Units to add.
    pub quantity: i64,
}

/// Input for changing the quantity of an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineUpdateInput {
    /// Line ID.
    pub id: String,
    /// New quantity.
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(amount: &str, currency_code: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: currency_code.to_string(),
        }
    }

    #[test]
    fn test_money_display() {
        assert_eq!(money("59.0", "USD").display(), "$59.00");
    }

    #[test]
    fn test_money_display_unknown_currency() {
        assert_eq!(money("1200", "JPY").display(), "1200 JPY");
    }

    #[test]
    fn test_cart_line_input_serializes_camel_case() {
        let input = CartLineInput {
            merchandise_id: "gid://shopify/ProductVariant/1".to_string(),
            quantity: 1,
        };
        let json = serde_json::to_value(&input).unwrap_or_default();
        assert_eq!(json["merchandiseId"], "gid://shopify/ProductVariant/1");
        assert_eq!(json["quantity"], 1);
    }
}
