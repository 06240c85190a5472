//! Courier delivery route handlers.
//!
//! Visible only to accounts carrying the delivery role.

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

use plateful_core::{OrderId, OrderStatus};

use crate::api::types::Order;
use crate::error::Result;
use crate::middleware::RequireDelivery;
use crate::models::ConfirmAction;
use crate::routes::confirm::arm_confirmation;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Delivery list template.
#[derive(Template, WebTemplate)]
#[template(path = "deliveries/index.html")]
pub struct DeliveriesTemplate {
    pub orders: Vec<Order>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Delivery detail template.
#[derive(Template, WebTemplate)]
#[template(path = "deliveries/show.html")]
pub struct DeliveryShowTemplate {
    pub order: Order,
    pub error: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub order_status: String,
}

/// Display orders out for delivery.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireDelivery(user): RequireDelivery,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let orders = state.api().delivery_orders(user.token()).await?;
    Ok(DeliveriesTemplate {
        orders,
        error: query.error,
        success: query.success,
    })
}

/// Display one delivery.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireDelivery(user): RequireDelivery,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let order = state.api().get_order(user.token(), OrderId::new(id)).await?;
    Ok(DeliveryShowTemplate {
        order,
        error: query.error,
    })
}

/// Update a delivery's status.
///
/// Marking an order delivered is irreversible and goes through the
/// confirmation gate; intermediate statuses apply directly.
#[instrument(skip(state, user, session, form))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireDelivery(user): RequireDelivery,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    let order_id = OrderId::new(id);
    let Ok(status) = form.order_status.parse::<OrderStatus>() else {
        return redirect_with_error(
            &format!("/deliveries/{order_id}"),
            "Unknown delivery status",
        )
        .into_response();
    };

    if status == OrderStatus::Delivered {
        return arm_confirmation(
            &session,
            "Mark as delivered",
            "Confirm that this order has been handed to the customer.",
            ConfirmAction::MarkDelivered(order_id),
        )
        .await;
    }

    match state
        .api()
        .update_order_status(user.token(), order_id, status)
        .await
    {
        Ok(()) => {
            redirect_with_success(&format!("/deliveries/{order_id}"), "Status updated")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Delivery status update failed: {e}");
            redirect_with_error(&format!("/deliveries/{order_id}"), &e.user_message())
                .into_response()
        }
    }
}
