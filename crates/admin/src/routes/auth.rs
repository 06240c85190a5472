//! Admin authentication route handlers.
//!
//! Login exchanges credentials with the backend and refuses sessions whose
//! claim set lacks the admin tag - a non-admin account never reaches a
//! console screen, it is turned away at session creation.

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

use plateful_core::{Claims, Email, Role};

use crate::middleware::set_current_admin;
use crate::models::{ConfirmAction, CurrentAdmin};
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let issued = match state.api().login(&form.email, &form.password).await {
        Ok(issued) => issued,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return redirect_with_error("/auth/login", &e.user_message()).into_response();
        }
    };

    // Only admin-tagged accounts get a console session.
    if !issued.roles.contains(&Role::Admin) {
        tracing::warn!("Non-admin account attempted console login");
        return redirect_with_error("/auth/login", "This account has no admin access")
            .into_response();
    }

    let profile = match state.api().get_profile(&issued.token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to fetch profile after login: {e}");
            return redirect_with_error("/auth/login", "Could not load your account")
                .into_response();
        }
    };

    let email = match Email::parse(&profile.email) {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Backend returned invalid account email: {e}");
            return redirect_with_error("/auth/login", "Could not load your account")
                .into_response();
        }
    };

    let admin = CurrentAdmin::new(
        profile.id,
        profile.name,
        email,
        issued.token,
        Claims::new(issued.roles, issued.expires_at),
    );

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to set session: {e}");
        return redirect_with_error("/auth/login", "Session error, please try again")
            .into_response();
    }

    Redirect::to("/").into_response()
}

/// Handle logout (confirm-gated).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    arm_confirmation(
        &session,
        "Log out",
        "End your admin session?",
        ConfirmAction::Logout,
    )
    .await
}
