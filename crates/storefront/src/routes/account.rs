//! Profile route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{UpdateProfileRequest, UserProfile};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub profile: UserProfile,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Profile edit template.
#[derive(Template, WebTemplate)]
#[template(path = "account/edit.html")]
pub struct AccountEditTemplate {
    pub profile: UserProfile,
    pub error: Option<String>,
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileForm {
    pub name: String,
    pub phone_number: String,
    pub address: Option<String>,
}

/// Display the profile page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let profile = state.api().get_profile(user.token()).await?;
    Ok(AccountTemplate {
        profile,
        error: query.error,
        success: query.success,
    })
}

/// Display the profile edit form.
#[instrument(skip(state, user))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let profile = state.api().get_profile(user.token()).await?;
    Ok(AccountEditTemplate {
        profile,
        error: query.error,
    })
}

/// Update the profile.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<UpdateProfileForm>,
) -> Response {
    if form.name.trim().is_empty() {
        return redirect_with_error("/account/edit", "Name cannot be empty").into_response();
    }

    let body = UpdateProfileRequest {
        name: form.name,
        phone_number: form.phone_number,
        address: form.address.filter(|a| !a.trim().is_empty()),
    };

    match state.api().update_profile(user.token(), &body).await {
        Ok(()) => redirect_with_success("/account", "Profile updated").into_response(),
        Err(e) => {
            tracing::warn!("Profile update failed: {e}");
            redirect_with_error("/account/edit", &e.user_message()).into_response()
        }
    }
}

/// Deactivate the account (confirm-gated).
#[instrument(skip(session))]
pub async fn deactivate(RequireAuth(_user): RequireAuth, session: Session) -> Response {
    arm_confirmation(
        &session,
        "Deactivate account",
        "Your account will be deactivated and you will be logged out. Continue?",
        ConfirmAction::DeactivateAccount,
    )
    .await
}
