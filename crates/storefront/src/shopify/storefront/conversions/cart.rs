//! Cart type conversion functions.

use uncmfrt_core::{LineState, Quantity};

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Cart, CartLine, CartMerchandise, CartMerchandiseProduct, SelectedOption,
};

use super::super::queries::{CartData, CartLineData, UserErrorData};
use super::{convert_image, convert_money};

/// Convert a `CartFields` fragment.
///
/// Every line comes back `Confirmed`: Shopify only returns state it has
/// applied. Pending state is layered on by the cart routes.
pub fn convert_cart(cart: CartData) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: Quantity::from_api(cart.total_quantity),
        subtotal: convert_money(cart.cost.subtotal_amount),
        lines: cart.lines.nodes.into_iter().map(convert_line).collect(),
    }
}

fn convert_line(line: CartLineData) -> CartLine {
    let merchandise = line.merchandise;
    CartLine {
        id: line.id,
        quantity: Quantity::from_api(line.quantity),
        state: LineState::Confirmed,
        merchandise: CartMerchandise {
            id: merchandise.id,
            title: merchandise.title,
            image: merchandise.image.map(convert_image),
            product: CartMerchandiseProduct {
                id: merchandise.product.id,
                title: merchandise.product.title,
                handle: merchandise.product.handle,
            },
            selected_options: merchandise
                .selected_options
                .into_iter()
                .map(|o| SelectedOption {
                    name: o.name,
                    value: o.value,
                })
                .collect(),
        },
        total_amount: convert_money(line.cost.total_amount),
    }
}

/// Fold mutation user errors into a single error, if there are any.
pub fn user_errors_to_error(errors: Vec<UserErrorData>) -> Option<ShopifyError> {
    if errors.is_empty() {
        return None;
    }

    Some(ShopifyError::UserError(
        errors
            .into_iter()
            .map(|e| match e.field {
                Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
                _ => e.message,
            })
            .collect::<Vec<_>>()
            .join("; "),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart_json(quantity: i64) -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": "https://uncmfrt.com/cart/c/abc",
            "totalQuantity": quantity,
            "cost": { "subtotalAmount": { "amount": "118.0", "currencyCode": "USD" } },
            "lines": { "nodes": [{
                "id": "gid://shopify/CartLine/1",
                "quantity": quantity,
                "cost": { "totalAmount": { "amount": "118.0", "currencyCode": "USD" } },
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/7",
                    "title": "Vanilla",
                    "image": null,
                    "selectedOptions": [{ "name": "Flavor", "value": "Vanilla" }],
                    "product": { "id": "gid://shopify/Product/1", "title": "Whey Blend", "handle": "whey-blend" }
                }
            }] }
        })
    }

    #[test]
    fn test_convert_cart_lines_confirmed() {
        let data: CartData = serde_json::from_value(cart_json(2)).unwrap();
        let cart = convert_cart(data);

        assert_eq!(cart.total_quantity, Quantity::new(2));
        assert_eq!(cart.lines.len(), 1);
        let line = cart.lines.first().unwrap();
        assert_eq!(line.state, LineState::Confirmed);
        assert_eq!(line.merchandise.product.handle, "whey-blend");
        assert_eq!(line.total_amount.display(), "$118.00");
    }

    #[test]
    fn test_convert_cart_clamps_negative_quantity() {
        let data: CartData = serde_json::from_value(cart_json(-1)).unwrap();
        let cart = convert_cart(data);
        assert_eq!(cart.lines.first().unwrap().quantity, Quantity::ZERO);
    }

    #[test]
    fn test_user_errors_empty() {
        assert!(user_errors_to_error(vec![]).is_none());
    }

    #[test]
    fn test_user_errors_joined_with_field() {
        let err = user_errors_to_error(vec![
            UserErrorData {
                field: Some(vec!["lines".to_string(), "0".to_string(), "quantity".to_string()]),
                message: "must be positive".to_string(),
            },
            UserErrorData {
                field: None,
                message: "cart is locked".to_string(),
            },
        ])
        .unwrap();
        assert_eq!(
            err.to_string(),
            "User error: lines.0.quantity: must be positive; cart is locked"
        );
    }
}
