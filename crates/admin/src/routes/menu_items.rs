//! Menu item management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::{CategoryId, MenuItemId, Money};

use crate::api::types::{Category, MenuItem, MenuItemRequest};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Menu item list template.
#[derive(Template, WebTemplate)]
#[template(path = "menu_items/index.html")]
pub struct MenuItemsTemplate {
    pub items: Vec<MenuItem>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Menu item form template (create and edit).
#[derive(Template, WebTemplate)]
#[template(path = "menu_items/form.html")]
pub struct MenuItemFormTemplate {
    pub item: Option<MenuItem>,
    pub categories: Vec<Category>,
    pub error: Option<String>,
}

/// Menu item form data.
#[derive(Debug, Deserialize)]
pub struct MenuItemForm {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category_id: i64,
    pub image_url: Option<String>,
}

impl MenuItemForm {
    /// Validate and convert into the API payload.
    fn into_request(self) -> std::result::Result<MenuItemRequest, &'static str> {
        if self.name.trim().is_empty() {
            return Err("Name is required");
        }
        let price = self
            .price
            .trim()
            .parse::<Decimal>()
            .map_err(|_| "Price must be a decimal amount")?;
        let price = Money::new(price);
        if !price.is_positive() {
            return Err("Price must be positive");
        }
        Ok(MenuItemRequest {
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            price,
            category_id: CategoryId::new(self.category_id),
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

/// List all menu items.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let items = state.api().get_menu_items(admin.token(), None).await?;
    Ok(MenuItemsTemplate {
        items,
        error: query.error,
        success: query.success,
    })
}

/// Display the create form.
#[instrument(skip(state, admin))]
pub async fn new_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let categories = state.api().get_categories(admin.token()).await?;
    Ok(MenuItemFormTemplate {
        item: None,
        categories,
        error: query.error,
    })
}

/// Create a menu item.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<MenuItemForm>,
) -> Response {
    let body = match form.into_request() {
        Ok(body) => body,
        Err(message) => {
            return redirect_with_error("/menu-items/new", message).into_response();
        }
    };

    match state.api().create_menu_item(admin.token(), &body).await {
        Ok(()) => redirect_with_success("/menu-items", "Menu item created").into_response(),
        Err(e) => redirect_with_error("/menu-items/new", &e.user_message()).into_response(),
    }
}

/// Display the edit form.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let item = state
        .api()
        .get_menu_item(admin.token(), MenuItemId::new(id))
        .await?;
    let categories = state.api().get_categories(admin.token()).await?;
    Ok(MenuItemFormTemplate {
        item: Some(item),
        categories,
        error: query.error,
    })
}

/// Update a menu item.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<MenuItemForm>,
) -> Response {
    let edit_path = format!("/menu-items/{id}/edit");
    let body = match form.into_request() {
        Ok(body) => body,
        Err(message) => return redirect_with_error(&edit_path, message).into_response(),
    };

    match state
        .api()
        .update_menu_item(admin.token(), MenuItemId::new(id), &body)
        .await
    {
        Ok(()) => redirect_with_success("/menu-items", "Menu item updated").into_response(),
        Err(e) => redirect_with_error(&edit_path, &e.user_message()).into_response(),
    }
}

/// Delete a menu item (confirm-gated).
#[instrument(skip(session))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    arm_confirmation(
        &session,
        "Delete menu item",
        "This dish will disappear from the menu. Continue?",
        ConfirmAction::DeleteMenuItem(MenuItemId::new(id)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_validation() {
        let form = MenuItemForm {
            name: "Pad Thai".to_string(),
            description: Some(String::new()),
            price: "12.50".to_string(),
            category_id: 3,
            image_url: None,
        };
        let body = form.into_request().expect("valid form");
        assert_eq!(body.price, Money::from_cents(1250));
        assert_eq!(body.description, None);

        let bad_price = MenuItemForm {
            name: "Pad Thai".to_string(),
            description: None,
            price: "twelve".to_string(),
            category_id: 3,
            image_url: None,
        };
        assert!(bad_price.into_request().is_err());

        let negative = MenuItemForm {
            name: "Pad Thai".to_string(),
            description: None,
            price: "-1".to_string(),
            category_id: 3,
            image_url: None,
        };
        assert!(negative.into_request().is_err());
    }
}
