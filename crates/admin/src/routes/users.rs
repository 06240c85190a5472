//! User account management route handlers.

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

use plateful_core::{Role, UserId};

use crate::api::types::{AccountRecord, RegisterStaffRequest, UpdateAccountRequest};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub users: Vec<AccountRecord>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Staff registration template.
#[derive(Template, WebTemplate)]
#[template(path = "users/register.html")]
pub struct RegisterStaffTemplate {
    pub error: Option<String>,
}

/// User edit template.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub user: AccountRecord,
    pub error: Option<String>,
}

/// Staff registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterStaffForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: String,
}

/// User update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    pub name: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub role: String,
}

fn parse_role(role: &str) -> Option<Role> {
    role.parse::<Role>().ok()
}

/// List all user accounts.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let users = state.api().get_users(admin.token()).await?;
    Ok(UsersTemplate {
        users,
        error: query.error,
        success: query.success,
    })
}

/// Display the staff registration form.
pub async fn register_page(
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterStaffTemplate { error: query.error }
}

/// Register a staff account.
#[instrument(skip(state, admin, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<RegisterStaffForm>,
) -> Response {
    let Some(role) = parse_role(&form.role) else {
        return redirect_with_error("/users/register", "Unknown role").into_response();
    };

    if form.password.len() < 8 {
        return redirect_with_error("/users/register", "Password must be at least 8 characters")
            .into_response();
    }

    let body = RegisterStaffRequest {
        name: form.name,
        email: form.email,
        phone_number: form.phone_number,
        password: form.password,
        roles: vec![role],
    };

    match state.api().register_staff(admin.token(), &body).await {
        Ok(()) => redirect_with_success("/users", "Account created").into_response(),
        Err(e) => redirect_with_error("/users/register", &e.user_message()).into_response(),
    }
}

/// Display the user edit form.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let user = state.api().get_user(admin.token(), UserId::new(id)).await?;
    Ok(UserEditTemplate {
        user,
        error: query.error,
    })
}

/// Update a user account.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<UpdateUserForm>,
) -> Response {
    let edit_path = format!("/users/{id}/edit");
    let Some(role) = parse_role(&form.role) else {
        return redirect_with_error(&edit_path, "Unknown role").into_response();
    };

    let body = UpdateAccountRequest {
        name: form.name,
        phone_number: form.phone_number,
        address: form.address.filter(|a| !a.trim().is_empty()),
        roles: vec![role],
    };

    match state
        .api()
        .update_user(admin.token(), UserId::new(id), &body)
        .await
    {
        Ok(()) => redirect_with_success("/users", "Account updated").into_response(),
        Err(e) => redirect_with_error(&edit_path, &e.user_message()).into_response(),
    }
}

/// Delete a user account (confirm-gated).
#[instrument(skip(admin, session))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    let target = UserId::new(id);

    // Self-deletion would strand the session mid-flight.
    if admin.id == target {
        return redirect_with_error("/users", "You cannot delete your own account")
            .into_response();
    }

    arm_confirmation(
        &session,
        "Delete user",
        "The account and its history will be removed. Continue?",
        ConfirmAction::DeleteUser(target),
    )
    .await
}
