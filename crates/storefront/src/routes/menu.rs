//! Catalog route handlers: categories and menu browsing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{CategoryId, MenuItemId};

use crate::api::types::{Category, MenuItem};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/categories.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<Category>,
}

/// Menu listing template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuTemplate {
    pub items: Vec<MenuItem>,
    pub categories: Vec<Category>,
    pub selected_category: Option<CategoryId>,
    pub search: Option<String>,
}

/// Menu item detail template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuShowTemplate {
    pub item: MenuItem,
}

/// Query parameters for menu filtering.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<i64>,
    pub q: Option<String>,
}

/// Display all categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.api().get_categories().await?;
    Ok(CategoriesTemplate { categories })
}

/// Display the menu, optionally filtered by category or search term.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<impl IntoResponse> {
    let selected_category = query.category.map(CategoryId::new);
    let search = query.q.filter(|q| !q.trim().is_empty());

    let items = state
        .api()
        .get_menu(selected_category, search.as_deref())
        .await?;
    let categories = state.api().get_categories().await.unwrap_or_default();

    Ok(MenuTemplate {
        items,
        categories,
        selected_category,
        search,
    })
}

/// Display a menu item with its reviews.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let item = state
        .api()
        .get_menu_item(MenuItemId::new(id))
        .await
        .map_err(|e| match e {
            crate::api::ApiError::Rejected { code: 404, .. } => {
                AppError::NotFound(format!("menu item {id}"))
            }
            other => AppError::Api(other),
        })?;

    Ok(MenuShowTemplate { item })
}
