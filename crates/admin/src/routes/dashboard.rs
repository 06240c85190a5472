//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub order_count: u64,
    pub payment_count: u64,
    pub user_count: usize,
    pub category_count: usize,
    pub error: Option<String>,
}

/// Display the dashboard with headline counts.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let token = admin.token();

    let orders = state.api().get_orders(token, None, 0).await?;
    let payments = state.api().get_payments(token, None, 0).await?;
    let users = state.api().get_users(token).await?;
    let categories = state.api().get_categories(token).await?;

    Ok(DashboardTemplate {
        admin_name: admin.name.clone(),
        order_count: orders.total_elements,
        payment_count: payments.total_elements,
        user_count: users.len(),
        category_count: categories.len(),
        error: query.error,
    })
}
