//! Status enums for orders and payments.
//!
//! Wire values match the backend's enums exactly.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed but not yet paid.
    #[default]
    Initialized,
    /// Payment completed; kitchen accepted.
    Confirmed,
    /// Handed to a courier.
    OnTheWay,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled (payment failed or staff cancellation).
    Cancelled,
}

impl OrderStatus {
    /// All statuses, for filter dropdowns.
    pub const ALL: [Self; 5] = [
        Self::Initialized,
        Self::Confirmed,
        Self::OnTheWay,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Initialized => "Initialized",
            Self::Confirmed => "Confirmed",
            Self::OnTheWay => "On the way",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Wire form, for query parameters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "INITIALIZED",
            Self::Confirmed => "CONFIRMED",
            Self::OnTheWay => "ON_THE_WAY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIALIZED" => Ok(Self::Initialized),
            "CONFIRMED" => Ok(Self::Confirmed),
            "ON_THE_WAY" => Ok(Self::OnTheWay),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status as recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No reconciled attempt yet.
    #[default]
    Pending,
    /// A successful charge was reconciled.
    Completed,
    /// The last reconciled attempt failed.
    Failed,
}

impl PaymentStatus {
    /// All statuses, for filter dropdowns.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Failed];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Wire form, for query parameters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_form() {
        let json = serde_json::to_string(&OrderStatus::OnTheWay).expect("serialize");
        assert_eq!(json, "\"ON_THE_WAY\"");
        let back: OrderStatus = serde_json::from_str("\"DELIVERED\"").expect("deserialize");
        assert_eq!(back, OrderStatus::Delivered);
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!("CONFIRMED".parse::<OrderStatus>(), Ok(OrderStatus::Confirmed));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_status_wire_form() {
        let json = serde_json::to_string(&PaymentStatus::Completed).expect("serialize");
        assert_eq!(json, "\"COMPLETED\"");
    }
}
