//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::api::types::Category;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub categories: Vec<Category>,
}

/// Display the home page with the category overview.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    // The home page renders with an empty shelf if the catalog is down.
    let categories = match state.api().get_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!("Failed to load categories for home page: {e}");
            Vec::new()
        }
    };

    HomeTemplate { user, categories }
}
