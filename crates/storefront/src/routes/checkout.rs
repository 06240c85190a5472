//! Payment page and checkout submission.
//!
//! The page hosts the processor's card element; submission hands the armed
//! attempt to the checkout orchestrator, which owns the
//! initialize -> confirm -> reconcile sequencing. The submit control is
//! disabled client-side while an attempt is in flight and the orchestrator
//! rejects re-entrant submits server-side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{OrderId, PaymentStatus};

use crate::api::types::Order;
use crate::middleware::{CspNonce, RequireCustomer};
use crate::payments::{CheckoutError, CheckoutRequest};
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/pay.html")]
pub struct PayTemplate {
    pub order: Order,
    pub publishable_key: String,
    pub nonce: String,
    pub error: Option<String>,
}

/// Payment form data: the payment-method reference minted by the hosted
/// card element.
#[derive(Debug, Deserialize)]
pub struct PayForm {
    pub payment_method: String,
}

/// Display the payment page for an order.
#[instrument(skip(state, user, nonce))]
pub async fn pay_page(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
    CspNonce(nonce): CspNonce,
) -> Response {
    let order_id = OrderId::new(id);
    let order = match state.api().get_order(user.token(), order_id).await {
        Ok(order) => order,
        Err(e) => {
            tracing::warn!("Failed to load order {order_id} for payment: {e}");
            return redirect_with_error("/orders", &e.user_message()).into_response();
        }
    };

    // Nothing to pay for twice.
    if order.payment_status == PaymentStatus::Completed {
        return Redirect::to(&format!("/orders/{order_id}")).into_response();
    }

    PayTemplate {
        order,
        publishable_key: state
            .config()
            .payments
            .publishable_key
            .expose_secret()
            .to_string(),
        nonce,
        error: query.error,
    }
    .into_response()
}

/// Submit a payment attempt for an order.
#[instrument(skip(state, user, form), fields(order_id = %id))]
pub async fn pay(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<i64>,
    Form(form): Form<PayForm>,
) -> Response {
    let order_id = OrderId::new(id);
    let pay_path = format!("/checkout/{order_id}/pay");

    // The amount comes from the order record, never from the form.
    let order = match state.api().get_order(user.token(), order_id).await {
        Ok(order) => order,
        Err(e) => return redirect_with_error("/orders", &e.user_message()).into_response(),
    };

    let request = CheckoutRequest {
        order_id,
        amount: order.total_amount,
        payment_method: form.payment_method,
    };

    match state.checkout().run(user.token(), request).await {
        Ok(outcome) if outcome.success => {
            redirect_with_success(&format!("/orders/{order_id}"), "Payment completed, thank you")
                .into_response()
        }
        Ok(outcome) => {
            // Terminal but unsuccessful: the attempt completed and was
            // reconciled; let the customer try again.
            let reason = outcome
                .failure_reason
                .unwrap_or_else(|| "The payment was not completed".to_string());
            redirect_with_error(&pay_path, &reason).into_response()
        }
        Err(e @ CheckoutError::Reconcile { charged: true, .. }) => {
            // The charge went through but the backend was not updated. Never
            // present this as "payment failed"; the order page shows the
            // pending state and support reconciles from the escalated event.
            redirect_with_error(&format!("/orders/{order_id}"), &e.user_message()).into_response()
        }
        Err(e) => redirect_with_error(&pay_path, &e.user_message()).into_response(),
    }
}
