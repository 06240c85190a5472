//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action (admin role enforced)
//! POST /auth/logout             - Logout (confirm-gated)
//!
//! # Categories
//! GET  /categories              - List
//! GET  /categories/new          - Create form
//! POST /categories/new          - Create
//! GET  /categories/{id}/edit    - Edit form
//! POST /categories/{id}/edit    - Update
//! POST /categories/{id}/delete  - Delete (confirm-gated)
//!
//! # Menu items
//! GET  /menu-items              - List
//! GET  /menu-items/new          - Create form
//! POST /menu-items/new          - Create
//! GET  /menu-items/{id}/edit    - Edit form
//! POST /menu-items/{id}/edit    - Update
//! POST /menu-items/{id}/delete  - Delete (confirm-gated)
//!
//! # Orders
//! GET  /orders                  - List (?status=, ?page=)
//! GET  /orders/{id}             - Detail
//! POST /orders/{id}/status      - Update status
//!
//! # Payments
//! GET  /payments                - List (?status=, ?page=)
//! GET  /payments/{id}           - Detail
//!
//! # Users
//! GET  /users                   - List
//! GET  /users/register          - Staff registration form
//! POST /users/register          - Register staff
//! GET  /users/{id}/edit         - Edit form
//! POST /users/{id}/edit         - Update
//! POST /users/{id}/delete       - Delete (confirm-gated)
//!
//! # Confirmation gate
//! GET  /confirm                 - Pending confirmation prompt
//! POST /confirm/accept          - Fire the armed action
//! POST /confirm/cancel          - Discard the armed action
//! ```

pub mod auth;
pub mod categories;
pub mod confirm;
pub mod dashboard;
pub mod menu_items;
pub mod orders;
pub mod payments;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for transient error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` carrying a transient error message.
#[must_use]
pub fn redirect_with_error(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect to `path` carrying a transient success message.
#[must_use]
pub fn redirect_with_success(path: &str, message: &str) -> axum::response::Redirect {
    axum::response::Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::show))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Categories
        .route("/categories", get(categories::index))
        .route(
            "/categories/new",
            get(categories::new_page).post(categories::create),
        )
        .route(
            "/categories/{id}/edit",
            get(categories::edit_page).post(categories::update),
        )
        .route("/categories/{id}/delete", post(categories::delete))
        // Menu items
        .route("/menu-items", get(menu_items::index))
        .route(
            "/menu-items/new",
            get(menu_items::new_page).post(menu_items::create),
        )
        .route(
            "/menu-items/{id}/edit",
            get(menu_items::edit_page).post(menu_items::update),
        )
        .route("/menu-items/{id}/delete", post(menu_items::delete))
        // Orders
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        // Payments
        .route("/payments", get(payments::index))
        .route("/payments/{id}", get(payments::show))
        // Users
        .route("/users", get(users::index))
        .route(
            "/users/register",
            get(users::register_page).post(users::register),
        )
        .route("/users/{id}/edit", get(users::edit_page).post(users::update))
        .route("/users/{id}/delete", post(users::delete))
        // Confirmation gate
        .route("/confirm", get(confirm::show))
        .route("/confirm/accept", post(confirm::accept))
        .route("/confirm/cancel", post(confirm::cancel))
}
