//! Payment processing: processor client and checkout orchestration.
//!
//! A checkout attempt coordinates three parties - the local order, the
//! backend's payment-intent issuance, and the processor's confirmation - into
//! one terminal outcome, then reconciles that outcome with the backend. The
//! orchestrator in [`checkout`] owns the sequencing; [`processor`] holds the
//! REST client for the confirmation leg.

pub mod checkout;
pub mod processor;

pub use checkout::{CheckoutError, CheckoutOrchestrator, CheckoutOutcome, CheckoutRequest};
pub use processor::{ProcessorClient, ProcessorError};

use serde::{Deserialize, Serialize};

use plateful_core::{Money, OrderId};

use crate::api::ApiError;

/// Opaque payment-intent handle issued by the backend.
///
/// Owned transiently for the duration of one checkout attempt; never
/// persisted beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentHandle(String);

impl IntentHandle {
    /// Wrap a backend-issued handle.
    #[must_use]
    pub const fn new(handle: String) -> Self {
        Self(handle)
    }

    /// The raw handle, as the processor expects it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The reconciliation record sent to the backend after the processor
/// responds. Write-once per attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub order_id: OrderId,
    pub amount: Money,
    pub transaction_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Definite processor statuses for a payment intent.
///
/// `Succeeded` is the only positive terminal state; every other definite
/// status reconciles as a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Succeeded,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    RequiresCapture,
    Processing,
    Canceled,
}

impl IntentStatus {
    /// Whether this status completes the attempt successfully.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Wire form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::RequiresCapture => "requires_capture",
            Self::Processing => "processing",
            Self::Canceled => "canceled",
        }
    }
}

/// The processor's answer to a confirmation call: the transaction it created
/// and the definite status it settled on.
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// Processor-side transaction (intent) id.
    pub transaction_id: String,
    /// Definite intent status.
    pub status: IntentStatus,
}

/// Backend legs of a checkout attempt: intent issuance and reconciliation.
///
/// Implemented by the backend API client; mocked in orchestrator tests.
pub trait PaymentGateway: Send + Sync {
    /// Ask the backend for a processor-consumable intent handle.
    fn initialize_payment(
        &self,
        token: &str,
        order_id: OrderId,
        amount: Money,
    ) -> impl Future<Output = Result<IntentHandle, ApiError>> + Send;

    /// Report a terminal attempt back to the backend.
    fn reconcile_payment(
        &self,
        token: &str,
        outcome: &PaymentOutcome,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Processor leg of a checkout attempt: card confirmation.
///
/// Implemented by [`ProcessorClient`]; mocked in orchestrator tests.
pub trait CardProcessor: Send + Sync {
    /// Confirm the intent with the given payment method.
    ///
    /// Returns a definite status, or an error when the processor itself
    /// rejects the attempt (declined card, malformed handle).
    fn confirm(
        &self,
        handle: &IntentHandle,
        payment_method: &str,
    ) -> impl Future<Output = Result<Confirmation, ProcessorError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_form() {
        let outcome = PaymentOutcome {
            order_id: OrderId::new(1),
            amount: Money::from_cents(2500),
            transaction_id: "tx_1".to_string(),
            success: true,
            failure_reason: None,
        };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["orderId"], 1);
        assert_eq!(json["amount"], "25.00");
        assert_eq!(json["transactionId"], "tx_1");
        assert_eq!(json["success"], true);
        assert!(json.get("failureReason").is_none());
    }

    #[test]
    fn test_intent_status_wire_form() {
        let status: IntentStatus = serde_json::from_str("\"requires_action\"").expect("parse");
        assert_eq!(status, IntentStatus::RequiresAction);
        assert!(!status.is_succeeded());
        assert!(IntentStatus::Succeeded.is_succeeded());
    }
}
