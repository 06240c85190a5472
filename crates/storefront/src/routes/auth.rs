//! Authentication route handlers.
//!
//! Login and registration exchange credentials with the backend; the session
//! value is replaced wholesale on every transition. Logout is confirm-gated.

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

use plateful_core::{Claims, Email};

use crate::api::types::RegisterRequest;
use crate::middleware::set_current_user;
use crate::models::{ConfirmAction, CurrentUser};
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// Exchanges credentials for a backend token and role claims, then stores the
/// assembled identity in the session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let issued = match state.api().login(&form.email, &form.password).await {
        Ok(issued) => issued,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return redirect_with_error("/auth/login", &e.user_message()).into_response();
        }
    };

    // Fetch the profile so the session carries a display identity.
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

    let user = CurrentUser::new(
        profile.id,
        profile.name,
        email,
        issued.token,
        Claims::new(issued.roles, issued.expires_at),
    );

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return redirect_with_error("/auth/login", "Session error, please try again")
            .into_response();
    }

    crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

    Redirect::to("/").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return redirect_with_error("/auth/register", "Passwords do not match").into_response();
    }

    // Validate password length
    if form.password.len() < 8 {
        return redirect_with_error("/auth/register", "Password must be at least 8 characters")
            .into_response();
    }

    if Email::parse(&form.email).is_err() {
        return redirect_with_error("/auth/register", "Enter a valid email address")
            .into_response();
    }

    let body = RegisterRequest {
        name: form.name,
        email: form.email,
        phone_number: form.phone_number,
        password: form.password,
        address: form.address.filter(|a| !a.trim().is_empty()),
    };

    match state.api().register(&body).await {
        Ok(()) => {
            redirect_with_success("/auth/login", "Account created, you can log in now")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            redirect_with_error("/auth/register", &e.user_message()).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Arms the confirmation gate; the session is cleared only after the user
/// confirms.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    arm_confirmation(
        &session,
        "Log out",
        "Are you sure you want to log out?",
        ConfirmAction::Logout,
    )
    .await
}
