//! Builders for home page test data.

use chrono::{TimeZone, Utc};

use crate::shopify::types::{Article, Blog, Image, Money, PriceRange, Product, ProductVariant};

pub(crate) fn product(id: u32, handle: &str) -> Product {
    Product {
        id: format!("gid://shopify/Product/{id}"),
        title: handle.replace('-', " "),
        handle: handle.to_string(),
        price_range: PriceRange {
            min_variant_price: Money {
                amount: "49.0".to_string(),
                currency_code: "USD".to_string(),
            },
        },
        images: vec![Image {
            id: Some(format!("gid://shopify/ProductImage/{id}")),
            url: format!("https://cdn.shopify.com/s/files/{handle}.png"),
            alt_text: None,
            width: Some(800),
            height: Some(800),
        }],
        variants: vec![ProductVariant {
            id: format!("gid://shopify/ProductVariant/{id}"),
            available_for_sale: true,
        }],
        star_rating_snippet: None,
    }
}

pub(crate) fn article(id: u32, title: &str) -> Article {
    Article {
        id: format!("gid://shopify/Article/{id}"),
        title: title.to_string(),
        content_html: format!("<p>{title}</p>"),
        excerpt: None,
        published_at: Utc
            .with_ymd_and_hms(2024, 11, 5, 14, 30, 0)
            .single()
            .unwrap_or_default(),
        author_name: Some("Dana Reyes".to_string()),
        image: None,
    }
}

pub(crate) fn blog(id: u32, title: &str, articles: Vec<Article>) -> Blog {
    Blog {
        id: format!("gid://shopify/Blog/{id}"),
        title: title.to_string(),
        handle: title.to_lowercase().replace(' ', "-"),
        articles,
    }
}
