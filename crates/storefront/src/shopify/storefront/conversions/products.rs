//! Product type conversion functions.

use crate::shopify::types::{PriceRange, Product, ProductVariant};

use super::super::queries::ProductCardData;
use super::{convert_image, convert_money};

/// Convert a `ProductCard` fragment into a domain product.
pub fn convert_product_card(product: ProductCardData) -> Product {
    Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        price_range: PriceRange {
            min_variant_price: convert_money(product.price_range.min_variant_price),
        },
        images: product
            .images
            .nodes
            .into_iter()
            .map(convert_image)
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(|v| ProductVariant {
                id: v.id,
                available_for_sale: v.available_for_sale,
            })
            .collect(),
        star_rating_snippet: product
            .okendo_star_rating_snippet
            .map(|m| m.value)
            .filter(|value| !value.is_empty()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_product_card() {
        let data: ProductCardData = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/1",
            "title": "Deep Sleep Stack",
            "handle": "deep-sleep-stack",
            "priceRange": { "minVariantPrice": { "amount": "59.0", "currencyCode": "USD" } },
            "images": { "nodes": [
                { "id": "img-1", "url": "https://cdn.shopify.com/a.png", "altText": null, "width": 800, "height": 800 }
            ] },
            "variants": { "nodes": [ { "id": "gid://shopify/ProductVariant/7", "availableForSale": true } ] },
            "okendoStarRatingSnippet": { "value": "" }
        }))
        .unwrap();

        let product = convert_product_card(data);

        assert_eq!(product.handle, "deep-sleep-stack");
        assert_eq!(product.price_range.min_variant_price.display(), "$59.00");
        assert_eq!(
            product.featured_image().unwrap().url,
            "https://cdn.shopify.com/a.png"
        );
        assert!(product.default_variant().unwrap().available_for_sale);
        assert!(product.star_rating_snippet.is_none());
    }
}
