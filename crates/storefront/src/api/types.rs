//! Wire types for the ordering backend REST API.
//!
//! The backend is a Java service; field names are camelCase on the wire.
//! These are pass-through payloads - the storefront renders them but owns
//! none of their business rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::{
    CartItemId, CategoryId, MenuItemId, Money, OrderId, OrderItemId, OrderStatus, PaymentStatus,
    ReviewId, Role, UserId,
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

/// Session issuance response: opaque token plus role claims.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub roles: Vec<Role>,
    pub expires_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// =============================================================================
// Profile
// =============================================================================

/// The authenticated account's profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Profile update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
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
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A customer review of a menu item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Review submission payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// The account's active cart.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_amount: Money,
}

/// One cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub menu_item: MenuItem,
    pub quantity: u32,
    pub subtotal: Money,
}

/// Add-to-cart payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

// =============================================================================
// Orders
// =============================================================================

/// An order, as listed in history and delivery screens.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Money,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One line of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub subtotal: Money,
}

/// Courier status-update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}

// =============================================================================
// Payments
// =============================================================================

/// Payment-intent initialization payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePaymentRequest {
    pub amount: Money,
    pub order_id: OrderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_from_backend_shape() {
        let json = r#"{
            "id": 12,
            "orderDate": "2026-03-01T12:30:00Z",
            "totalAmount": "42.50",
            "orderStatus": "CONFIRMED",
            "paymentStatus": "COMPLETED",
            "deliveryAddress": "1 Main St",
            "items": [
                {"id": 1, "menuItemId": 7, "name": "Pad Thai", "quantity": 2, "price": "12.50", "subtotal": "25.00"}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.id, OrderId::new(12));
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_amount.to_string(), "$42.50");
    }

    #[test]
    fn test_initialize_payment_request_wire_form() {
        let body = InitializePaymentRequest {
            amount: Money::from_cents(2500),
            order_id: OrderId::new(1),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["orderId"], 1);
        assert_eq!(json["amount"], "25.00");
    }
}
