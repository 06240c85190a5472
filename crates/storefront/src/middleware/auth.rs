//! Authentication middleware and extractors.
//!
//! Provides extractors for gating route handlers behind a capability
//! requirement. Each extractor reads the session-stored [`CurrentUser`],
//! evaluates the pure guard decision in `plateful_core::access`, and either
//! passes the identity through unchanged or rejects with a navigation to the
//! login page (HTML) / `401 Unauthorized` (under `/api/`). Guards perform no
//! network calls and never cache a decision past a session change.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use plateful_core::{Decision, Requirement, Role, access};

use crate::models::{CurrentUser, session_keys};

/// Error returned when a capability requirement is not met.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Evaluate `requirement` against the session, yielding the identity on grant.
async fn guard(parts: &mut Parts, requirement: Requirement) -> Result<CurrentUser, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    let user: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    let decision = access::evaluate(
        user.as_ref().map(|u| &u.claims),
        Utc::now(),
        requirement,
    );

    match (decision, user) {
        (Decision::Grant, Some(user)) => Ok(user),
        _ => {
            // Denials are silent: no error message, just the login entry point.
            let is_api = parts.uri.path().starts_with("/api/");
            if is_api {
                Err(AuthRejection::Unauthorized)
            } else {
                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}

/// Extractor that requires any authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, Requirement::Authenticated).await.map(Self)
    }
}

/// Extractor that requires the customer role.
pub struct RequireCustomer(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, Requirement::Role(Role::Customer))
            .await
            .map(Self)
    }
}

/// Extractor that requires the courier role.
pub struct RequireDelivery(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireDelivery
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, Requirement::Role(Role::Delivery))
            .await
            .map(Self)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike the requiring extractors, this does not reject the request when the
/// visitor is not logged in; expired sessions read as absent.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten()
                .filter(|u| !u.claims.is_expired(Utc::now())),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
