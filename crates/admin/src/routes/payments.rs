//! Payment records route handlers.
//!
//! Read-only: payments are created by checkout reconciliation, never from
//! the console.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{PaymentId, PaymentStatus};

use crate::api::types::{Page, Payment};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Payment list template.
#[derive(Template, WebTemplate)]
#[template(path = "payments/index.html")]
pub struct PaymentsTemplate {
    pub page: Page<Payment>,
    pub statuses: Vec<PaymentStatus>,
    pub selected_status: Option<PaymentStatus>,
    pub error: Option<String>,
}

/// Payment detail template.
#[derive(Template, WebTemplate)]
#[template(path = "payments/show.html")]
pub struct PaymentShowTemplate {
    pub payment: Payment,
}

/// Payment list query parameters.
#[derive(Debug, Deserialize)]
pub struct PaymentsQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub error: Option<String>,
}

/// List payments, filtered and paged.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PaymentsQuery>,
) -> Result<impl IntoResponse> {
    let selected_status = match query.status.as_deref() {
        Some("PENDING") => Some(PaymentStatus::Pending),
        Some("COMPLETED") => Some(PaymentStatus::Completed),
        Some("FAILED") => Some(PaymentStatus::Failed),
        _ => None,
    };

    let page = state
        .api()
        .get_payments(admin.token(), selected_status, query.page.unwrap_or(0))
        .await?;

    Ok(PaymentsTemplate {
        page,
        statuses: PaymentStatus::ALL.to_vec(),
        selected_status,
        error: query.error,
    })
}

/// Display one payment.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let payment = state
        .api()
        .get_payment(admin.token(), PaymentId::new(id))
        .await?;
    Ok(PaymentShowTemplate { payment })
}
