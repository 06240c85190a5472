//! Cart route handlers.
//!
//! The backend owns the cart; every mutation round-trips and re-renders. All
//! cart screens require the customer role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::{CartItemId, MenuItemId};

use crate::api::types::Cart;
use crate::middleware::RequireCustomer;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub cart: Cart,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub menu_item_id: i64,
    pub quantity: Option<u32>,
}

/// Cart line form data.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub cart_item_id: i64,
}

/// Display the cart page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let cart = match state.api().get_cart(user.token()).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            Cart::default()
        }
    };

    CartTemplate {
        cart,
        error: query.error,
        success: query.success,
    }
}

/// Add a menu item to the cart.
#[instrument(skip(state, user, form))]
pub async fn add(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1).max(1);
    match state
        .api()
        .add_to_cart(user.token(), MenuItemId::new(form.menu_item_id), quantity)
        .await
    {
        Ok(()) => redirect_with_success("/cart", "Added to cart").into_response(),
        Err(e) => {
            tracing::warn!("Failed to add to cart: {e}");
            redirect_with_error("/cart", &e.user_message()).into_response()
        }
    }
}

/// Increment a cart line.
#[instrument(skip(state, user, form))]
pub async fn increment(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Form(form): Form<CartLineForm>,
) -> Response {
    match state
        .api()
        .increment_cart_item(user.token(), CartItemId::new(form.cart_item_id))
        .await
    {
        Ok(()) => Redirect::to("/cart").into_response(),
        Err(e) => redirect_with_error("/cart", &e.user_message()).into_response(),
    }
}

/// Decrement a cart line.
#[instrument(skip(state, user, form))]
pub async fn decrement(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Form(form): Form<CartLineForm>,
) -> Response {
    match state
        .api()
        .decrement_cart_item(user.token(), CartItemId::new(form.cart_item_id))
        .await
    {
        Ok(()) => Redirect::to("/cart").into_response(),
        Err(e) => redirect_with_error("/cart", &e.user_message()).into_response(),
    }
}

/// Remove a cart line.
#[instrument(skip(state, user, form))]
pub async fn remove(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Form(form): Form<CartLineForm>,
) -> Response {
    match state
        .api()
        .remove_cart_item(user.token(), CartItemId::new(form.cart_item_id))
        .await
    {
        Ok(()) => Redirect::to("/cart").into_response(),
        Err(e) => redirect_with_error("/cart", &e.user_message()).into_response(),
    }
}

/// Empty the cart (confirm-gated).
#[instrument(skip(session))]
pub async fn clear(RequireCustomer(_user): RequireCustomer, session: Session) -> Response {
    arm_confirmation(
        &session,
        "Clear cart",
        "Remove every item from your cart?",
        ConfirmAction::ClearCart,
    )
    .await
}

/// Place an order from the cart, then continue to payment.
#[instrument(skip(state, user))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
) -> Response {
    match state.api().place_order(user.token()).await {
        Ok(order) => Redirect::to(&format!("/checkout/{}/pay", order.id)).into_response(),
        Err(e) => {
            tracing::warn!("Checkout failed: {e}");
            redirect_with_error("/cart", &e.user_message()).into_response()
        }
    }
}
