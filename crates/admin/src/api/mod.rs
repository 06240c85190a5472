//! Ordering backend admin API client.
//!
//! Mirrors the storefront's client shape for the admin endpoint set:
//! category and menu CRUD, order and payment listings, user management.
//! The `{statusCode, data, message}` envelope is converted into a tagged
//! [`ApiResult`] at the boundary.

pub mod types;

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use plateful_core::{CategoryId, MenuItemId, OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};

use types::{
    AccountRecord, Category, CategoryRequest, LoginRequest, LoginResponse, MenuItem,
    MenuItemRequest, Order, OrderStatusUpdate, Page, Payment, RegisterStaffRequest,
    UpdateAccountRequest, UserProfile,
};

/// Default page size for admin listings.
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Errors that can occur when calling the ordering backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success envelope.
    #[error("backend rejected request ({code}): {message}")]
    Rejected {
        /// Envelope status code.
        code: u16,
        /// Envelope message, or a fallback when absent.
        message: String,
    },

    /// The response body was not a valid envelope.
    #[error("malformed backend response: {0}")]
    Parse(String),

    /// A success envelope arrived without its data payload.
    #[error("backend response missing data")]
    MissingData,
}

impl ApiError {
    /// Message safe to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::MissingData => {
                "The service is temporarily unavailable, please try again".to_string()
            }
        }
    }
}

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// The backend's response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status_code: u16,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> ApiResult<T> {
        if self.status_code == 200 {
            self.data.ok_or(ApiError::MissingData)
        } else {
            Err(ApiError::Rejected {
                code: self.status_code,
                message: self
                    .message
                    .unwrap_or_else(|| "Request rejected".to_string()),
            })
        }
    }

    fn into_ack(self) -> ApiResult<()> {
        if self.status_code == 200 {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                code: self.status_code,
                message: self
                    .message
                    .unwrap_or_else(|| "Request rejected".to_string()),
            })
        }
    }
}

/// Client for the ordering backend's admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: api_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        Self::parse_envelope(request).await?.into_result()
    }

    async fn execute_ack(&self, request: reqwest::RequestBuilder) -> ApiResult<()> {
        Self::parse_envelope::<serde_json::Value>(request)
            .await?
            .into_ack()
    }

    async fn parse_envelope<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> ApiResult<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a session token and role claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(
            self.request(Method::POST, "/api/auth/login", None)
                .json(&body),
        )
        .await
    }

    /// Fetch the authenticated account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn get_profile(&self, token: &str) -> ApiResult<UserProfile> {
        self.execute(self.request(Method::GET, "/api/users/account", Some(token)))
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_categories(&self, token: &str) -> ApiResult<Vec<Category>> {
        self.execute(self.request(Method::GET, "/api/categories/all", Some(token)))
            .await
    }

    /// Get one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found.
    #[instrument(skip(self, token))]
    pub async fn get_category(&self, token: &str, id: CategoryId) -> ApiResult<Category> {
        self.execute(self.request(Method::GET, &format!("/api/categories/{id}"), Some(token)))
            .await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if creation is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn create_category(&self, token: &str, body: &CategoryRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::POST, "/api/categories", Some(token))
                .json(body),
        )
        .await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn update_category(
        &self,
        token: &str,
        id: CategoryId,
        body: &CategoryRequest,
    ) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::PUT, &format!("/api/categories/{id}"), Some(token))
                .json(body),
        )
        .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_category(&self, token: &str, id: CategoryId) -> ApiResult<()> {
        self.execute_ack(self.request(
            Method::DELETE,
            &format!("/api/categories/{id}"),
            Some(token),
        ))
        .await
    }

    // =========================================================================
    // Menu items
    // =========================================================================

    /// List menu items, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_menu_items(
        &self,
        token: &str,
        category: Option<CategoryId>,
    ) -> ApiResult<Vec<MenuItem>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = category {
            query.push(("categoryId", category.to_string()));
        }
        self.execute(
            self.request(Method::GET, "/api/menu", Some(token))
                .query(&query),
        )
        .await
    }

    /// Get one menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    #[instrument(skip(self, token))]
    pub async fn get_menu_item(&self, token: &str, id: MenuItemId) -> ApiResult<MenuItem> {
        self.execute(self.request(Method::GET, &format!("/api/menu/{id}"), Some(token)))
            .await
    }

    /// Create a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if creation is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn create_menu_item(&self, token: &str, body: &MenuItemRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::POST, "/api/menu", Some(token))
                .json(body),
        )
        .await
    }

    /// Update a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn update_menu_item(
        &self,
        token: &str,
        id: MenuItemId,
        body: &MenuItemRequest,
    ) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::PUT, &format!("/api/menu/{id}"), Some(token))
                .json(body),
        )
        .await
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_menu_item(&self, token: &str, id: MenuItemId) -> ApiResult<()> {
        self.execute_ack(self.request(Method::DELETE, &format!("/api/menu/{id}"), Some(token)))
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_orders(
        &self,
        token: &str,
        status: Option<OrderStatus>,
        page: u32,
    ) -> ApiResult<Page<Order>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("size", DEFAULT_PAGE_SIZE.to_string()),
        ];
        if let Some(status) = status {
            query.push(("orderStatus", status.as_str().to_string()));
        }
        self.execute(
            self.request(Method::GET, "/api/orders/all", Some(token))
                .query(&query),
        )
        .await
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    #[instrument(skip(self, token))]
    pub async fn get_order(&self, token: &str, id: OrderId) -> ApiResult<Order> {
        self.execute(self.request(Method::GET, &format!("/api/orders/{id}"), Some(token)))
            .await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token))]
    pub async fn update_order_status(
        &self,
        token: &str,
        id: OrderId,
        status: OrderStatus,
    ) -> ApiResult<()> {
        let body = OrderStatusUpdate {
            order_status: status,
        };
        self.execute_ack(
            self.request(Method::PUT, &format!("/api/orders/{id}/status"), Some(token))
                .json(&body),
        )
        .await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// List payments, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_payments(
        &self,
        token: &str,
        status: Option<PaymentStatus>,
        page: u32,
    ) -> ApiResult<Page<Payment>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("size", DEFAULT_PAGE_SIZE.to_string()),
        ];
        if let Some(status) = status {
            query.push(("paymentStatus", status.as_str().to_string()));
        }
        self.execute(
            self.request(Method::GET, "/api/payments/all", Some(token))
                .query(&query),
        )
        .await
    }

    /// Get one payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is not found.
    #[instrument(skip(self, token))]
    pub async fn get_payment(&self, token: &str, id: PaymentId) -> ApiResult<Payment> {
        self.execute(self.request(Method::GET, &format!("/api/payments/{id}"), Some(token)))
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_users(&self, token: &str) -> ApiResult<Vec<AccountRecord>> {
        self.execute(self.request(Method::GET, "/api/users/all", Some(token)))
            .await
    }

    /// Get one user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not found.
    #[instrument(skip(self, token))]
    pub async fn get_user(&self, token: &str, id: UserId) -> ApiResult<AccountRecord> {
        self.execute(self.request(Method::GET, &format!("/api/users/{id}"), Some(token)))
            .await
    }

    /// Register a staff account with explicit roles.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected.
    #[instrument(skip(self, token, body), fields(email = %body.email))]
    pub async fn register_staff(&self, token: &str, body: &RegisterStaffRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::POST, "/api/auth/register", Some(token))
                .json(body),
        )
        .await
    }

    /// Update a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn update_user(
        &self,
        token: &str,
        id: UserId,
        body: &UpdateAccountRequest,
    ) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::PUT, &format!("/api/users/{id}"), Some(token))
                .json(body),
        )
        .await
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_user(&self, token: &str, id: UserId) -> ApiResult<()> {
        self.execute_ack(self.request(Method::DELETE, &format!("/api/users/{id}"), Some(token)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_envelope_roundtrip() {
        let json = r#"{
            "statusCode": 200,
            "message": "Payments retrieved successfully",
            "data": {
                "content": [],
                "totalPages": 1,
                "totalElements": 0,
                "number": 0
            }
        }"#;
        let envelope: Envelope<Page<Payment>> = serde_json::from_str(json).expect("deserialize");
        let page = envelope.into_result().expect("ok");
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_rejection_envelope_yields_message() {
        let envelope: Envelope<Page<Payment>> =
            serde_json::from_str(r#"{"statusCode": 403, "message": "Forbidden"}"#)
                .expect("deserialize");
        match envelope.into_result() {
            Err(ApiError::Rejected { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
