//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Catalog (public)
//! GET  /categories              - Category listing
//! GET  /menu                    - Menu listing (?category=, ?q=)
//! GET  /menu/{id}               - Menu item detail with reviews
//!
//! # Cart (requires customer role)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add menu item
//! POST /cart/increment          - Increment a line
//! POST /cart/decrement          - Decrement a line
//! POST /cart/remove             - Remove a line
//! POST /cart/clear              - Empty the cart (confirm-gated)
//! POST /cart/checkout           - Place the order, then pay
//!
//! # Checkout (requires customer role)
//! GET  /checkout/{order_id}/pay - Payment page
//! POST /checkout/{order_id}/pay - Submit the payment attempt
//!
//! # Orders (requires customer role)
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Order detail
//! GET  /orders/{id}/review      - Leave-review form
//! POST /orders/{id}/review      - Submit review
//!
//! # Account (requires auth)
//! GET  /account                 - Profile
//! GET  /account/edit            - Edit profile form
//! POST /account/edit            - Update profile
//! POST /account/deactivate      - Deactivate account (confirm-gated)
//!
//! # Deliveries (requires courier role)
//! GET  /deliveries              - Orders out for delivery
//! GET  /deliveries/{id}         - Delivery detail
//! POST /deliveries/{id}/status  - Update delivery status
//!
//! # Auth (rate limited)
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout (confirm-gated)
//!
//! # Confirmation gate
//! GET  /confirm                 - Pending confirmation prompt
//! POST /confirm/accept          - Fire the armed action
//! POST /confirm/cancel          - Discard the armed action
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod confirm;
pub mod deliveries;
pub mod home;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Query parameters for transient error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` carrying a transient, dismissible error message.
#[must_use]
pub fn redirect_with_error(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect to `path` carrying a transient success message.
#[must_use]
pub fn redirect_with_success(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route(
            "/{id}/review",
            get(orders::review_page).post(orders::review),
        )
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/edit", get(account::edit_page).post(account::update))
        .route("/deactivate", post(account::deactivate))
}

/// Create the delivery routes router.
pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(deliveries::index))
        .route("/{id}", get(deliveries::show))
        .route("/{id}/status", post(deliveries::update_status))
}

/// Create the confirmation gate router.
pub fn confirm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(confirm::show))
        .route("/accept", post(confirm::accept))
        .route("/cancel", post(confirm::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/categories", get(menu::categories))
        .route("/menu", get(menu::index))
        .route("/menu/{id}", get(menu::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route(
            "/checkout/{id}/pay",
            get(checkout::pay_page).post(checkout::pay),
        )
        // Orders
        .nest("/orders", order_routes())
        // Account
        .nest("/account", account_routes())
        // Deliveries (courier)
        .nest("/deliveries", delivery_routes())
        // Confirmation gate
        .nest("/confirm", confirm_routes())
        // Auth (brute-force limited)
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
}
