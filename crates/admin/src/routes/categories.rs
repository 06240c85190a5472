//! Category management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::CategoryId;

use crate::api::types::{Category, CategoryRequest};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<Category>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Category form template (create and edit).
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub category: Option<Category>,
    pub error: Option<String>,
}

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryForm {
    fn into_request(self) -> CategoryRequest {
        CategoryRequest {
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// List all categories.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let categories = state.api().get_categories(admin.token()).await?;
    Ok(CategoriesTemplate {
        categories,
        error: query.error,
        success: query.success,
    })
}

/// Display the create form.
pub async fn new_page(
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    CategoryFormTemplate {
        category: None,
        error: query.error,
    }
}

/// Create a category.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Response {
    if form.name.trim().is_empty() {
        return redirect_with_error("/categories/new", "Name is required").into_response();
    }

    match state
        .api()
        .create_category(admin.token(), &form.into_request())
        .await
    {
        Ok(()) => redirect_with_success("/categories", "Category created").into_response(),
        Err(e) => redirect_with_error("/categories/new", &e.user_message()).into_response(),
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
    let category = state
        .api()
        .get_category(admin.token(), CategoryId::new(id))
        .await?;
    Ok(CategoryFormTemplate {
        category: Some(category),
        error: query.error,
    })
}

/// Update a category.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let edit_path = format!("/categories/{id}/edit");
    if form.name.trim().is_empty() {
        return redirect_with_error(&edit_path, "Name is required").into_response();
    }

    match state
        .api()
        .update_category(admin.token(), CategoryId::new(id), &form.into_request())
        .await
    {
        Ok(()) => redirect_with_success("/categories", "Category updated").into_response(),
        Err(e) => redirect_with_error(&edit_path, &e.user_message()).into_response(),
    }
}

/// Delete a category (confirm-gated).
#[instrument(skip(session))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    arm_confirmation(
        &session,
        "Delete category",
        "Deleting a category also hides its menu items. Continue?",
        ConfirmAction::DeleteCategory(CategoryId::new(id)),
    )
    .await
}
