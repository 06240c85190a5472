//! Wire types for the ordering backend's admin endpoints.
//!
//! Field names are camelCase on the wire. List endpoints that can grow
//! without bound (orders, payments) are paged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::{
    CategoryId, MenuItemId, Money, OrderId, OrderItemId, OrderStatus, PaymentId, PaymentStatus,
    Role, UserId,
};

// =============================================================================
// Auth
// =============================================================================

/// Login form payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session issuance response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub roles: Vec<Role>,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated account's profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

// =============================================================================
// Paging
// =============================================================================

/// One page of a paged listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    /// Zero-based page index.
    pub number: u32,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.number > 0
    }

    /// One-based next page index for links.
    #[must_use]
    pub const fn next_number(&self) -> u32 {
        self.number + 1
    }

    /// One-based previous page index for links.
    #[must_use]
    pub const fn prev_number(&self) -> u32 {
        self.number.saturating_sub(1)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A menu category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Category create/update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A menu item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Menu item create/update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order, as the admin console sees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Money,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One line of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub subtotal: Money,
}

/// Order status update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}

// =============================================================================
// Payments
// =============================================================================

/// A recorded payment attempt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Money,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub customer_name: Option<String>,
}

// =============================================================================
// Users
// =============================================================================

/// A user account, as the admin console sees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Staff registration payload (role-assigning registration).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStaffRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub roles: Vec<Role>,
}

/// Account update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let page: Page<Payment> = Page {
            content: Vec::new(),
            total_pages: 3,
            total_elements: 42,
            number: 1,
        };
        assert!(page.has_next());
        assert!(page.has_prev());
        assert_eq!(page.next_number(), 2);
        assert_eq!(page.prev_number(), 0);

        let last: Page<Payment> = Page {
            content: Vec::new(),
            total_pages: 3,
            total_elements: 42,
            number: 2,
        };
        assert!(!last.has_next());
    }

    #[test]
    fn test_payment_deserializes_from_backend_shape() {
        let json = r#"{
            "id": 5,
            "amount": "19.99",
            "paymentStatus": "FAILED",
            "transactionId": "tx_9",
            "failureReason": "payment status: requires_action",
            "orderId": 12
        }"#;
        let payment: Payment = serde_json::from_str(json).expect("deserialize");
        assert_eq!(payment.payment_status, PaymentStatus::Failed);
        assert_eq!(payment.order_id, Some(OrderId::new(12)));
    }

    #[test]
    fn test_register_staff_wire_form() {
        let body = RegisterStaffRequest {
            name: "Courier Carl".to_string(),
            email: "carl@plateful.dev".to_string(),
            phone_number: "555-0100".to_string(),
            password: "delivery-route-9".to_string(),
            roles: vec![Role::Delivery],
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["roles"][0], "DELIVERY");
        assert_eq!(json["phoneNumber"], "555-0100");
    }
}
