//! Ordering backend REST API client.
//!
//! All backend calls flow through [`BackendClient`]. The backend wraps every
//! response in a `{statusCode, data, message}` envelope; this module converts
//! that envelope into a tagged [`ApiResult`] at the boundary so failure
//! handling is exhaustive rather than convention-based. Public catalog reads
//! are cached with `moka` (5-minute TTL).

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use plateful_core::{CartItemId, CategoryId, MenuItemId, Money, OrderId, OrderStatus};

use crate::config::BackendConfig;
use crate::payments::{IntentHandle, PaymentGateway, PaymentOutcome};
use types::{
    AddToCartRequest, Cart, Category, InitializePaymentRequest, LoginRequest, LoginResponse,
    MenuItem, Order, OrderStatusUpdate, RegisterRequest, ReviewRequest, UpdateProfileRequest,
    UserProfile,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

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
    ///
    /// Backend envelope messages are written for end users; transport and
    /// parse failures get a generic line instead.
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
    /// Convert into a tagged result, requiring a data payload on success.
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

    /// Convert into a tagged acknowledgement, ignoring any data payload.
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

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Categories(Vec<Category>),
    Menu(Vec<MenuItem>),
}

/// Client for the ordering backend REST API.
///
/// Cheaply cloneable; holds a connection pool and the catalog cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                cache,
            }),
        }
    }

    /// Build a request for `path`, attaching the bearer token when given.
    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and unwrap the backend envelope into `T`.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        Self::parse_envelope(request).await?.into_result()
    }

    /// Send a request and unwrap the backend envelope into an acknowledgement.
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
    /// Returns an error if the credentials are rejected or the request fails.
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

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected (e.g. duplicate email).
    #[instrument(skip(self, body), fields(email = %body.email))]
    pub async fn register(&self, body: &RegisterRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::POST, "/api/auth/register", None)
                .json(body),
        )
        .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the authenticated account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_profile(&self, token: &str) -> ApiResult<UserProfile> {
        self.execute(self.request(Method::GET, "/api/users/account", Some(token)))
            .await
    }

    /// Update the authenticated account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip(self, token, body))]
    pub async fn update_profile(&self, token: &str, body: &UpdateProfileRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::PUT, "/api/users/update", Some(token))
                .json(body),
        )
        .await
    }

    /// Deactivate the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn deactivate_account(&self, token: &str) -> ApiResult<()> {
        self.execute_ack(self.request(Method::DELETE, "/api/users/deactivate", Some(token)))
            .await
    }

    // =========================================================================
    // Catalog (cached - public reads)
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .execute(self.request(Method::GET, "/api/categories/all", None))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the request fails.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: CategoryId) -> ApiResult<Category> {
        self.execute(self.request(Method::GET, &format!("/api/categories/{id}"), None))
            .await
    }

    /// List menu items, optionally filtered by category or search term.
    ///
    /// Unfiltered listings are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_menu(
        &self,
        category: Option<CategoryId>,
        search: Option<&str>,
    ) -> ApiResult<Vec<MenuItem>> {
        let unfiltered = category.is_none() && search.is_none();
        let cache_key = "menu".to_string();

        if unfiltered
            && let Some(CacheValue::Menu(items)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for menu");
            return Ok(items);
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = category {
            query.push(("categoryId", category.to_string()));
        }
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }

        let items: Vec<MenuItem> = self
            .execute(
                self.request(Method::GET, "/api/menu", None)
                    .query(&query),
            )
            .await?;

        if unfiltered {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Menu(items.clone()))
                .await;
        }

        Ok(items)
    }

    /// Get a menu item by id, including its reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found or the request fails.
    #[instrument(skip(self))]
    pub async fn get_menu_item(&self, id: MenuItemId) -> ApiResult<MenuItem> {
        self.execute(self.request(Method::GET, &format!("/api/menu/{id}"), None))
            .await
    }

    // =========================================================================
    // Cart (not cached - mutable state)
    // =========================================================================

    /// Fetch the account's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> ApiResult<Cart> {
        self.execute(self.request(Method::GET, "/api/cart", Some(token)))
            .await
    }

    /// Add a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, token))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        menu_item_id: MenuItemId,
        quantity: u32,
    ) -> ApiResult<()> {
        let body = AddToCartRequest {
            menu_item_id,
            quantity,
        };
        self.execute_ack(
            self.request(Method::POST, "/api/cart/items", Some(token))
                .json(&body),
        )
        .await
    }

    /// Increment a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, token))]
    pub async fn increment_cart_item(&self, token: &str, id: CartItemId) -> ApiResult<()> {
        self.execute_ack(self.request(
            Method::PUT,
            &format!("/api/cart/items/{id}/increment"),
            Some(token),
        ))
        .await
    }

    /// Decrement a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, token))]
    pub async fn decrement_cart_item(&self, token: &str, id: CartItemId) -> ApiResult<()> {
        self.execute_ack(self.request(
            Method::PUT,
            &format!("/api/cart/items/{id}/decrement"),
            Some(token),
        ))
        .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, token))]
    pub async fn remove_cart_item(&self, token: &str, id: CartItemId) -> ApiResult<()> {
        self.execute_ack(self.request(
            Method::DELETE,
            &format!("/api/cart/items/{id}"),
            Some(token),
        ))
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> ApiResult<()> {
        self.execute_ack(self.request(Method::DELETE, "/api/cart", Some(token)))
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if checkout is rejected (e.g. empty cart).
    #[instrument(skip(self, token))]
    pub async fn place_order(&self, token: &str) -> ApiResult<Order> {
        self.execute(self.request(Method::POST, "/api/orders/checkout", Some(token)))
            .await
    }

    /// List the account's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> ApiResult<Vec<Order>> {
        self.execute(self.request(Method::GET, "/api/orders/me", Some(token)))
            .await
    }

    /// Get one of the account's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or not visible.
    #[instrument(skip(self, token))]
    pub async fn get_order(&self, token: &str, id: OrderId) -> ApiResult<Order> {
        self.execute(self.request(Method::GET, &format!("/api/orders/{id}"), Some(token)))
            .await
    }

    /// Submit a review for a delivered order's menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is rejected.
    #[instrument(skip(self, token, body))]
    pub async fn leave_review(&self, token: &str, body: &ReviewRequest) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::POST, "/api/reviews", Some(token))
                .json(body),
        )
        .await
    }

    // =========================================================================
    // Deliveries (courier role)
    // =========================================================================

    /// List orders currently out for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delivery_orders(&self, token: &str) -> ApiResult<Vec<Order>> {
        self.execute(self.request(Method::GET, "/api/orders/deliveries", Some(token)))
            .await
    }

    /// Update an order's delivery status.
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

}

// =============================================================================
// Payment legs (PaymentGateway seam)
// =============================================================================

impl PaymentGateway for BackendClient {
    /// Ask the backend to issue a payment intent for an order.
    ///
    /// Returns the processor-consumable opaque handle on success. The backend
    /// refuses when the order is unknown, the amount mismatches, or the
    /// payment is already completed.
    #[instrument(skip(self, token))]
    async fn initialize_payment(
        &self,
        token: &str,
        order_id: OrderId,
        amount: Money,
    ) -> ApiResult<IntentHandle> {
        let body = InitializePaymentRequest { amount, order_id };
        let handle: String = self
            .execute(
                self.request(Method::POST, "/api/payments/pay", Some(token))
                    .json(&body),
            )
            .await?;
        Ok(IntentHandle::new(handle))
    }

    /// Report a terminal payment attempt back to the backend.
    #[instrument(skip(self, token, outcome), fields(order_id = %outcome.order_id, success = outcome.success))]
    async fn reconcile_payment(&self, token: &str, outcome: &PaymentOutcome) -> ApiResult<()> {
        self.execute_ack(
            self.request(Method::PUT, "/api/payments/update", Some(token))
                .json(outcome),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_yields_data() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"statusCode": 200, "message": "Success", "data": "pi_abc"}"#)
                .expect("deserialize");
        assert_eq!(envelope.into_result().expect("ok"), "pi_abc");
    }

    #[test]
    fn test_rejection_envelope_yields_message() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"statusCode": 400, "message": "Amount is required"}"#)
                .expect("deserialize");
        match envelope.into_result() {
            Err(ApiError::Rejected { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "Amount is required");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_without_message_gets_fallback() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"statusCode": 500}"#).expect("deserialize");
        match envelope.into_result() {
            Err(ApiError::Rejected { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "Request rejected");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_success_envelope_without_data_is_error() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"statusCode": 200, "message": "ok"}"#).expect("deserialize");
        assert!(matches!(envelope.into_result(), Err(ApiError::MissingData)));
    }

    #[test]
    fn test_ack_ignores_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"statusCode": 200}"#).expect("deserialize");
        assert!(envelope.into_ack().is_ok());
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = ApiError::Rejected {
            code: 400,
            message: "Payment amount is incorrect".to_string(),
        };
        assert_eq!(err.user_message(), "Payment amount is incorrect");

        let err = ApiError::MissingData;
        assert!(err.user_message().contains("temporarily unavailable"));
    }
}
