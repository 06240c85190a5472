//! Order management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{OrderId, OrderStatus};

use crate::api::types::{Order, Page};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::{redirect_with_error, redirect_with_success};
use crate::state::AppState;

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub page: Page<Order>,
    pub statuses: Vec<OrderStatus>,
    pub selected_status: Option<OrderStatus>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: Order,
    pub statuses: Vec<OrderStatus>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Order list query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub order_status: String,
}

/// List orders, filtered and paged.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let selected_status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());

    let page = state
        .api()
        .get_orders(admin.token(), selected_status, query.page.unwrap_or(0))
        .await?;

    Ok(OrdersTemplate {
        page,
        statuses: OrderStatus::ALL.to_vec(),
        selected_status,
        error: query.error,
        success: query.success,
    })
}

/// Display one order.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let order = state.api().get_order(admin.token(), OrderId::new(id)).await?;
    Ok(OrderShowTemplate {
        order,
        statuses: OrderStatus::ALL.to_vec(),
        error: query.error,
        success: query.success,
    })
}

/// Update an order's status.
#[instrument(skip(state, admin, form))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    let order_path = format!("/orders/{id}");
    let Ok(status) = form.order_status.parse::<OrderStatus>() else {
        return redirect_with_error(&order_path, "Unknown order status").into_response();
    };

    match state
        .api()
        .update_order_status(admin.token(), OrderId::new(id), status)
        .await
    {
        Ok(()) => redirect_with_success(&order_path, "Status updated").into_response(),
        Err(e) => redirect_with_error(&order_path, &e.user_message()).into_response(),
    }
}
