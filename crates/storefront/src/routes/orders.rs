//! Order history and review route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{MenuItemId, OrderId};

use crate::api::types::{Order, ReviewRequest};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub orders: Vec<Order>,
    pub error: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: Order,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Leave-review template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/review.html")]
pub struct ReviewTemplate {
    pub order: Order,
    pub error: Option<String>,
}

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub menu_item_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Display order history.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let orders = state.api().my_orders(user.token()).await?;
    Ok(OrdersTemplate {
        orders,
        error: query.error,
    })
}

/// Display one order.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let order = state
        .api()
        .get_order(user.token(), OrderId::new(id))
        .await
        .map_err(|e| match e {
            crate::api::ApiError::Rejected { code: 404, .. } => {
                AppError::NotFound(format!("order {id}"))
            }
            other => AppError::Api(other),
        })?;

    Ok(OrderShowTemplate {
        order,
        error: query.error,
        success: query.success,
    })
}

/// Display the leave-review form for a delivered order.
#[instrument(skip(state, user))]
pub async fn review_page(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let order = state.api().get_order(user.token(), OrderId::new(id)).await?;
    Ok(ReviewTemplate {
        order,
        error: query.error,
    })
}

/// Submit a review.
#[instrument(skip(state, user, form))]
pub async fn review(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let order_id = OrderId::new(id);

    if !(1..=5).contains(&form.rating) {
        return redirect_with_error(
            &format!("/orders/{order_id}/review"),
            "Rating must be between 1 and 5",
        )
        .into_response();
    }

    let body = ReviewRequest {
        order_id,
        menu_item_id: MenuItemId::new(form.menu_item_id),
        rating: form.rating,
        comment: form.comment.filter(|c| !c.trim().is_empty()),
    };

    match state.api().leave_review(user.token(), &body).await {
        Ok(()) => {
            redirect_with_success(&format!("/orders/{order_id}"), "Thanks for your review")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Review submission failed: {e}");
            redirect_with_error(&format!("/orders/{order_id}/review"), &e.user_message())
                .into_response()
        }
    }
}
