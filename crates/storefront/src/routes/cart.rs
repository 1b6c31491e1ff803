//! Cart route handlers.
//!
//! Cart forms post with an `HX-Request: true` header when `static/js/cart.js`
//! is loaded and get fragments back; plain form posts fall back to a redirect
//! to `/cart`. Cart IDs are stored in the session and mapped to Shopify carts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uncmfrt_core::{LineState, Quantity, QuantityTargets};

use crate::cart_session::{cart_id, set_cart_id};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::shopify::types::{Cart, CartLine, CartLineInput, CartLineUpdateInput, SelectedOption};
use crate::state::AppState;

/// Header set by the cart script on enhanced form posts.
const HX_REQUEST: &str = "HX-Request";

/// Event the page listens for to refresh the count badge.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Variant title Shopify gives single-variant products.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

// =============================================================================
// View Types
// =============================================================================

/// Image display data for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// The `-`/`+` controls of one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityControlView {
    pub line_id: String,
    pub quantity: u32,
    /// Quantity the decrease button submits; zero removes the line.
    pub decrement: u32,
    /// Quantity the increase button submits.
    pub increment: u32,
    /// Both buttons are disabled while a mutation is in flight.
    pub disabled: bool,
}

impl QuantityControlView {
    /// Controls for a line holding `quantity` units in `state`.
    #[must_use]
    pub fn new(line_id: &str, quantity: Quantity, state: LineState) -> Self {
        let targets = QuantityTargets::for_quantity(quantity);
        Self {
            line_id: line_id.to_string(),
            quantity: quantity.get(),
            decrement: targets.decrement.get(),
            increment: targets.increment.get(),
            disabled: !state.controls_enabled(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub url: String,
    pub line_price: String,
    pub image: Option<ImageView>,
    pub pending: bool,
    pub control: QuantityControlView,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let merchandise = &line.merchandise;
        Self {
            id: line.id.clone(),
            title: merchandise.product.title.clone(),
            variant_title: (merchandise.title != DEFAULT_VARIANT_TITLE)
                .then(|| merchandise.title.clone()),
            url: variant_url(&merchandise.product.handle, &merchandise.selected_options),
            line_price: line.total_amount.display(),
            image: merchandise.image.as_ref().map(|image| ImageView {
                url: image.url.clone(),
                alt: image
                    .alt_text
                    .clone()
                    .unwrap_or_else(|| merchandise.product.title.clone()),
            }),
            pending: line.state.is_pending(),
            control: QuantityControlView::new(&line.id, line.quantity, line.state),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
    pub checkout_url: Option<String>,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
            checkout_url: None,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal.display(),
            item_count: cart.total_quantity.get(),
            checkout_url: Some(cart.checkout_url.clone()),
        }
    }
}

/// Product page link preselecting the line's variant options.
///
/// Single-variant products carry a `Title=Default Title` option that is
/// left out of the query string.
fn variant_url(handle: &str, options: &[SelectedOption]) -> String {
    let query: Vec<String> = options
        .iter()
        .filter(|option| option.value != DEFAULT_VARIANT_TITLE)
        .map(|option| {
            format!(
                "{}={}",
                urlencoding::encode(&option.name),
                urlencoding::encode(&option.value)
            )
        })
        .collect();

    if query.is_empty() {
        format!("/products/{handle}")
    } else {
        format!("/products/{handle}?{}", query.join("&"))
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Quantity control form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub nonce: String,
}

/// Cart items fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether the request came from the cart script rather than a plain form.
fn wants_fragment(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Mark lines with a mutation in flight and build the view.
fn cart_view(state: &AppState, mut cart: Cart) -> CartView {
    state.pending().apply(&mut cart);
    CartView::from(&cart)
}

/// Fetch the visitor's cart as Shopify currently has it.
///
/// A cart that cannot be fetched renders as empty.
async fn current_cart(state: &AppState, session: &Session) -> CartView {
    let Some(cart_id) = cart_id(session).await else {
        return CartView::empty();
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(cart) => cart_view(state, cart),
        Err(e) => {
            tracing::warn!(cart_id = %cart_id, error = %e, "Failed to fetch cart");
            CartView::empty()
        }
    }
}

/// Respond to a line mutation with the items fragment, or redirect.
fn items_response(headers: &HeaderMap, cart: CartView, updated: bool) -> Response {
    if !wants_fragment(headers) {
        return Redirect::to("/cart").into_response();
    }

    let fragment = CartItemsTemplate { cart };
    if updated {
        (AppendHeaders([CART_UPDATED_TRIGGER]), fragment).into_response()
    } else {
        fragment.into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    CartShowTemplate {
        cart: current_cart(&state, &session).await,
        nonce,
    }
}

/// Add item to cart.
///
/// Creates a new cart if one doesn't exist, or adds to the existing cart.
/// Enhanced requests get the count badge back with a `cart-updated` trigger.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = Quantity::new(form.quantity.unwrap_or(1).max(1));
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[
            ("variant_id", form.variant_id.as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );

    let line = CartLineInput {
        merchandise_id: form.variant_id,
        quantity: quantity.to_api(),
    };

    let result = match cart_id(&session).await {
        Some(cart_id) => state.storefront().add_to_cart(&cart_id, vec![line]).await,
        None => state.storefront().create_cart(vec![line]).await,
    };

    let cart = match result {
        Ok(cart) => cart,
        Err(e) => {
            tracing::error!(error = %e, "Failed to add item to cart");
            let count = current_cart(&state, &session).await.item_count;
            return Ok(if wants_fragment(&headers) {
                CartCountTemplate { count }.into_response()
            } else {
                Redirect::to("/cart").into_response()
            });
        }
    };

    set_cart_id(&session, &cart.id).await?;

    if !wants_fragment(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count: cart.total_quantity.get(),
        },
    )
        .into_response())
}

fn require_line_id(line_id: &str) -> Result<()> {
    if line_id.trim().is_empty() {
        return Err(AppError::BadRequest("missing line_id".to_string()));
    }
    Ok(())
}

/// Apply a quantity control.
///
/// A target of zero removes the line. A line with a mutation still in flight
/// is re-rendered as is; the mutation is not queued.
#[instrument(skip(state, session, headers), fields(line_id = %form.line_id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    require_line_id(&form.line_id)?;
    let Some(cart_id) = cart_id(&session).await else {
        return Ok(items_response(&headers, CartView::empty(), false));
    };

    let Some(mutation) = state.pending().begin(&cart_id, &form.line_id) else {
        tracing::info!("Line mutation already in flight");
        let cart = current_cart(&state, &session).await;
        return Ok(items_response(&headers, cart, false));
    };
    tracing::debug!(mutation_id = %mutation.id(), "Line mutation started");

    let quantity = Quantity::new(form.quantity);
    add_breadcrumb(
        "cart",
        if quantity.is_zero() {
            "Removed line"
        } else {
            "Changed line quantity"
        },
        Some(&[
            ("line_id", form.line_id.as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );

    let result = if quantity.is_zero() {
        state
            .storefront()
            .remove_cart_lines(&cart_id, vec![form.line_id.clone()])
            .await
    } else {
        state
            .storefront()
            .update_cart_lines(
                &cart_id,
                vec![CartLineUpdateInput {
                    id: form.line_id.clone(),
                    quantity: quantity.to_api(),
                }],
            )
            .await
    };

    mutation.finish();

    match result {
        Ok(cart) => Ok(items_response(&headers, cart_view(&state, cart), true)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update cart line");
            let cart = current_cart(&state, &session).await;
            Ok(items_response(&headers, cart, false))
        }
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, session, headers), fields(line_id = %form.line_id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    require_line_id(&form.line_id)?;
    let Some(cart_id) = cart_id(&session).await else {
        return Ok(items_response(&headers, CartView::empty(), false));
    };

    let Some(mutation) = state.pending().begin(&cart_id, &form.line_id) else {
        tracing::info!("Line mutation already in flight");
        let cart = current_cart(&state, &session).await;
        return Ok(items_response(&headers, cart, false));
    };
    tracing::debug!(mutation_id = %mutation.id(), "Line mutation started");

    add_breadcrumb(
        "cart",
        "Removed line",
        Some(&[("line_id", form.line_id.as_str())]),
    );

    let result = state
        .storefront()
        .remove_cart_lines(&cart_id, vec![form.line_id.clone()])
        .await;

    mutation.finish();

    match result {
        Ok(cart) => Ok(items_response(&headers, cart_view(&state, cart), true)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to remove cart line");
            let cart = current_cart(&state, &session).await;
            Ok(items_response(&headers, cart, false))
        }
    }
}

/// Get cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: current_cart(&state, &session).await.item_count,
    }
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = cart_id(&session).await else {
        return Redirect::to("/cart").into_response();
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(cart) if !cart.lines.is_empty() => Redirect::to(&cart.checkout_url).into_response(),
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get cart for checkout");
            Redirect::to("/cart").into_response()
        }
    }
}
