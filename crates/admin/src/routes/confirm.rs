//! Confirmation gate routes for the admin console.
//!
//! Deletes and logout arm the session-stored gate and resolve here; the
//! armed action fires at most once.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::ConfirmGate;

use crate::models::{ConfirmAction, CurrentAdmin, session_keys};
use crate::routes::{redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Confirmation prompt template.
#[derive(Template, WebTemplate)]
#[template(path = "confirm/show.html")]
pub struct ConfirmTemplate {
    pub title: String,
    pub message: String,
}

/// Load the gate from the session (idle if absent).
async fn load_gate(session: &Session) -> ConfirmGate<ConfirmAction> {
    session
        .get(session_keys::CONFIRM_GATE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the gate back to the session.
async fn save_gate(session: &Session, gate: &ConfirmGate<ConfirmAction>) {
    if let Err(e) = session.insert(session_keys::CONFIRM_GATE, gate).await {
        tracing::error!("Failed to persist confirmation gate: {e}");
    }
}

/// Arm the gate with a pending action and navigate to the prompt.
pub async fn arm_confirmation(
    session: &Session,
    title: &str,
    message: &str,
    action: ConfirmAction,
) -> Response {
    let mut gate = load_gate(session).await;
    gate.arm(title, message, action);
    save_gate(session, &gate).await;
    Redirect::to("/confirm").into_response()
}

/// Display the pending confirmation prompt.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Response {
    let gate = load_gate(&session).await;
    match gate.pending() {
        Some(pending) => ConfirmTemplate {
            title: pending.title.clone(),
            message: pending.message.clone(),
        }
        .into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// Fire the armed action.
#[instrument(skip(state, session))]
pub async fn accept(State(state): State<AppState>, session: Session) -> Response {
    let mut gate = load_gate(&session).await;
    let action = gate.confirm();
    save_gate(&session, &gate).await;

    let Some(action) = action else {
        return Redirect::to("/").into_response();
    };

    dispatch(&state, &session, action).await
}

/// Discard the armed action.
#[instrument(skip(session))]
pub async fn cancel(session: Session) -> Response {
    let mut gate = load_gate(&session).await;
    let return_path = gate
        .pending()
        .map_or("/", |p| p.action.return_path());
    gate.cancel();
    save_gate(&session, &gate).await;
    Redirect::to(return_path).into_response()
}

/// Execute a confirmed action exactly once.
async fn dispatch(state: &AppState, session: &Session, action: ConfirmAction) -> Response {
    let admin: Option<CurrentAdmin> = session
        .get(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten();

    match action {
        ConfirmAction::Logout => {
            if let Err(e) = crate::middleware::clear_current_admin(session).await {
                tracing::error!("Failed to clear session: {e}");
            }
            if let Err(e) = session.flush().await {
                tracing::error!("Failed to flush session: {e}");
            }
            Redirect::to("/auth/login").into_response()
        }

        ConfirmAction::DeleteCategory(id) => {
            let Some(admin) = admin else {
                return Redirect::to("/auth/login").into_response();
            };
            match state.api().delete_category(admin.token(), id).await {
                Ok(()) => redirect_with_success("/categories", "Category deleted").into_response(),
                Err(e) => redirect_with_error("/categories", &e.user_message()).into_response(),
            }
        }

        ConfirmAction::DeleteMenuItem(id) => {
            let Some(admin) = admin else {
                return Redirect::to("/auth/login").into_response();
            };
            match state.api().delete_menu_item(admin.token(), id).await {
                Ok(()) => redirect_with_success("/menu-items", "Menu item deleted").into_response(),
                Err(e) => redirect_with_error("/menu-items", &e.user_message()).into_response(),
            }
        }

        ConfirmAction::DeleteUser(id) => {
            let Some(admin) = admin else {
                return Redirect::to("/auth/login").into_response();
            };
            match state.api().delete_user(admin.token(), id).await {
                Ok(()) => redirect_with_success("/users", "User deleted").into_response(),
                Err(e) => redirect_with_error("/users", &e.user_message()).into_response(),
            }
        }
    }
}
