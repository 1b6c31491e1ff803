//! Conversions from raw Storefront API responses to domain types.

pub mod blogs;
pub mod cart;
pub mod products;

pub use blogs::convert_blog;
pub use cart::{convert_cart, user_errors_to_error};
pub use products::convert_product_card;

use crate::shopify::types::{Image, Money};

use super::queries::{ImageData, MoneyData};

pub(crate) fn convert_money(money: MoneyData) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

pub(crate) fn convert_image(image: ImageData) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}
