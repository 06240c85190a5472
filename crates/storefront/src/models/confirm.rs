//! Confirmable actions for the storefront.

use serde::{Deserialize, Serialize};

use plateful_core::OrderId;

/// Actions that must pass the confirmation gate before firing.
///
/// The gate itself lives in `plateful_core::confirm`; the `/confirm` routes
/// dispatch whichever of these the user approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfirmAction {
    /// End the session.
    Logout,
    /// Empty the cart.
    ClearCart,
    /// Deactivate the account.
    DeactivateAccount,
    /// Mark a delivery as delivered (courier screens).
    MarkDelivered(OrderId),
}

impl ConfirmAction {
    /// Where to land after the action resolves (confirm or cancel).
    #[must_use]
    pub const fn return_path(&self) -> &'static str {
        match self {
            Self::Logout => "/",
            Self::ClearCart => "/cart",
            Self::DeactivateAccount => "/account",
            Self::MarkDelivered(_) => "/deliveries",
        }
    }
}
