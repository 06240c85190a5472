//! Confirmation gate routes.
//!
//! Destructive actions arm the session-stored gate and land here. The gate
//! holds at most one pending action; confirming dispatches it exactly once,
//! cancelling discards it, and the gate is idle again on every exit path.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::{ConfirmGate, OrderStatus};

use crate::models::{ConfirmAction, CurrentUser, session_keys};
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
///
/// Arming replaces any previously pending action (last call wins).
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
///
/// With nothing armed (stale link, double navigation) there is nothing to
/// ask; go home.
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
        // Nothing armed (duplicate submit); the gate never fires twice.
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

/// Execute a confirmed action.
///
/// Runs exactly once per armed action; the gate was already returned to idle
/// before dispatch, so retries find nothing to fire.
async fn dispatch(state: &AppState, session: &Session, action: ConfirmAction) -> Response {
    let user: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    match action {
        ConfirmAction::Logout => {
            if let Err(e) = crate::middleware::clear_current_user(session).await {
                tracing::error!("Failed to clear session: {e}");
            }
            // Also destroy the entire session
            if let Err(e) = session.flush().await {
                tracing::error!("Failed to flush session: {e}");
            }
            crate::error::clear_sentry_user();
            Redirect::to("/").into_response()
        }

        ConfirmAction::ClearCart => {
            let Some(user) = user else {
                return Redirect::to("/auth/login").into_response();
            };
            match state.api().clear_cart(user.token()).await {
                Ok(()) => redirect_with_success("/cart", "Cart cleared").into_response(),
                Err(e) => redirect_with_error("/cart", &e.user_message()).into_response(),
            }
        }

        ConfirmAction::DeactivateAccount => {
            let Some(user) = user else {
                return Redirect::to("/auth/login").into_response();
            };
            match state.api().deactivate_account(user.token()).await {
                Ok(()) => {
                    if let Err(e) = session.flush().await {
                        tracing::error!("Failed to flush session: {e}");
                    }
                    crate::error::clear_sentry_user();
                    redirect_with_success("/", "Your account has been deactivated").into_response()
                }
                Err(e) => redirect_with_error("/account", &e.user_message()).into_response(),
            }
        }

        ConfirmAction::MarkDelivered(order_id) => {
            let Some(user) = user else {
                return Redirect::to("/auth/login").into_response();
            };
            match state
                .api()
                .update_order_status(user.token(), order_id, OrderStatus::Delivered)
                .await
            {
                Ok(()) => {
                    redirect_with_success("/deliveries", "Order marked as delivered")
                        .into_response()
                }
                Err(e) => redirect_with_error("/deliveries", &e.user_message()).into_response(),
            }
        }
    }
}
