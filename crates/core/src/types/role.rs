//! Account roles.

use serde::{Deserialize, Serialize};

/// Role tags assigned to an account by the backend.
///
/// An account may hold more than one tag; checks treat tags as independent,
/// non-exclusive predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer: cart, checkout, orders, reviews.
    Customer,
    /// Staff with access to the admin console.
    Admin,
    /// Courier with access to delivery tracking screens.
    Delivery,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Admin => write!(f, "ADMIN"),
            Self::Delivery => write!(f, "DELIVERY"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMIN" => Ok(Self::Admin),
            "DELIVERY" => Ok(Self::Delivery),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_string(&Role::Delivery).expect("serialize");
        assert_eq!(json, "\"DELIVERY\"");
        let back: Role = serde_json::from_str("\"CUSTOMER\"").expect("deserialize");
        assert_eq!(back, Role::Customer);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("manager".parse::<Role>().is_err());
    }
}
