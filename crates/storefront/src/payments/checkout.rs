//! Checkout orchestration.
//!
//! Drives a single checkout attempt to a terminal, reconciled outcome:
//!
//! ```text
//! Idle -> Initializing -> AwaitingConfirmation -> Reconciling -> Terminal
//! ```
//!
//! The three legs run strictly in sequence; a later leg never starts before
//! the prior one's response is observed. Every definite processor status -
//! successful or not - is reconciled with the backend exactly once (with a
//! single transport-level retry). A processor-side error aborts without a
//! reconciliation call; the processor owns that failure. The per-order
//! in-flight slot rejects re-entrant submissions before any external call and
//! is not released until the reconcile leg has been attempted.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use plateful_core::{Money, OrderId};

use crate::api::ApiError;

use super::{CardProcessor, PaymentGateway, PaymentOutcome, ProcessorError};

/// One checkout submission.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// The order being paid for.
    pub order_id: OrderId,
    /// Amount the customer is paying; must match the order total backend-side.
    pub amount: Money,
    /// Processor payment-method reference collected by the hosted element.
    pub payment_method: String,
}

/// Terminal result of a completed attempt.
///
/// `success == false` is a completed attempt, not an error: the processor
/// settled on a definite non-successful status and the backend was told so.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub amount: Money,
    pub transaction_id: String,
    pub success: bool,
    /// Definite non-successful status, for display.
    pub failure_reason: Option<String>,
}

/// Ways an attempt can fail before reaching a reconciled terminal state.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Amount was not strictly positive.
    #[error("a positive amount is required")]
    InvalidAmount,

    /// Another attempt for this order is still in flight.
    #[error("a payment attempt for this order is already in progress")]
    AttemptInFlight,

    /// The backend refused to issue an intent. Nothing was charged and no
    /// reconciliation is owed.
    #[error("payment initialization failed: {0}")]
    Initialize(#[source] ApiError),

    /// The processor rejected the confirmation. The processor owns this
    /// failure; no reconciliation is owed.
    #[error("payment confirmation failed: {0}")]
    Processor(#[source] ProcessorError),

    /// Reconciliation failed even after a retry. When `charged` is true the
    /// money has moved but the order record has not - the one genuinely
    /// dangerous case, escalated by the error layer.
    #[error("payment reconciliation failed (charged: {charged}): {source}")]
    Reconcile {
        charged: bool,
        #[source]
        source: ApiError,
    },
}

impl CheckoutError {
    /// Message safe to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidAmount => "A valid amount is required".to_string(),
            Self::AttemptInFlight => {
                "A payment attempt is already in progress for this order".to_string()
            }
            Self::Initialize(e) => e.user_message(),
            Self::Processor(e) => e.user_message(),
            Self::Reconcile { charged: true, .. } => {
                "Your card was charged but we could not update your order; \
                 our team has been notified and will reconcile it shortly"
                    .to_string()
            }
            Self::Reconcile { charged: false, .. } => {
                "The payment could not be completed, please try again".to_string()
            }
        }
    }

    /// Whether a charge occurred that the backend does not know about.
    #[must_use]
    pub const fn is_dangling_charge(&self) -> bool {
        matches!(self, Self::Reconcile { charged: true, .. })
    }
}

/// Coordinates the three legs of a checkout attempt.
///
/// Generic over the backend gateway and the card processor so the sequencing
/// contract can be tested without the network.
pub struct CheckoutOrchestrator<G, P> {
    gateway: G,
    processor: P,
    in_flight: Mutex<HashSet<i64>>,
}

impl<G, P> CheckoutOrchestrator<G, P>
where
    G: PaymentGateway,
    P: CardProcessor,
{
    /// Create a new orchestrator.
    pub fn new(gateway: G, processor: P) -> Self {
        Self {
            gateway,
            processor,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Drive one attempt from submission to its terminal state.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]. A `Reconcile` error with `charged: true` means
    /// the customer was charged; callers must not present it as "payment
    /// failed".
    #[instrument(skip(self, token, request), fields(order_id = %request.order_id, amount = %request.amount))]
    pub async fn run(
        &self,
        token: &str,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if !request.amount.is_positive() {
            return Err(CheckoutError::InvalidAmount);
        }

        // Holds the per-order slot until this attempt reaches a terminal
        // state; released on drop after the reconcile leg has run.
        let _slot = AttemptSlot::acquire(&self.in_flight, request.order_id)?;

        // Initializing: the backend must issue an intent handle before the
        // processor is involved at all.
        let handle = self
            .gateway
            .initialize_payment(token, request.order_id, request.amount)
            .await
            .map_err(CheckoutError::Initialize)?;

        // AwaitingConfirmation: hand the intent to the processor.
        let confirmation = self
            .processor
            .confirm(&handle, &request.payment_method)
            .await
            .map_err(CheckoutError::Processor)?;

        // Reconciling: every definite status is reported, success or not.
        let success = confirmation.status.is_succeeded();
        let outcome = PaymentOutcome {
            order_id: request.order_id,
            amount: request.amount,
            transaction_id: confirmation.transaction_id,
            success,
            failure_reason: (!success)
                .then(|| format!("payment status: {}", confirmation.status.as_str())),
        };

        self.reconcile(token, &outcome).await?;

        info!(
            order_id = %outcome.order_id,
            transaction_id = %outcome.transaction_id,
            success,
            "Checkout attempt reached terminal state"
        );

        Ok(CheckoutOutcome {
            order_id: outcome.order_id,
            amount: outcome.amount,
            transaction_id: outcome.transaction_id,
            success,
            failure_reason: outcome.failure_reason,
        })
    }

    /// Send the reconciliation record, retrying once on failure.
    async fn reconcile(
        &self,
        token: &str,
        outcome: &PaymentOutcome,
    ) -> Result<(), CheckoutError> {
        if let Err(first) = self.gateway.reconcile_payment(token, outcome).await {
            warn!(
                order_id = %outcome.order_id,
                transaction_id = %outcome.transaction_id,
                error = %first,
                "Reconciliation call failed, retrying once"
            );

            if let Err(retry) = self.gateway.reconcile_payment(token, outcome).await {
                if outcome.success {
                    error!(
                        order_id = %outcome.order_id,
                        transaction_id = %outcome.transaction_id,
                        amount = %outcome.amount,
                        error = %retry,
                        "Charge succeeded but reconciliation failed; order record is stale"
                    );
                } else {
                    error!(
                        order_id = %outcome.order_id,
                        transaction_id = %outcome.transaction_id,
                        error = %retry,
                        "Reconciliation of failed attempt could not be delivered"
                    );
                }
                return Err(CheckoutError::Reconcile {
                    charged: outcome.success,
                    source: retry,
                });
            }
        }
        Ok(())
    }
}

/// RAII slot marking an order's attempt as in flight.
struct AttemptSlot<'a> {
    set: &'a Mutex<HashSet<i64>>,
    id: i64,
}

impl<'a> AttemptSlot<'a> {
    fn acquire(set: &'a Mutex<HashSet<i64>>, order_id: OrderId) -> Result<Self, CheckoutError> {
        let id = order_id.as_i64();
        let mut guard = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.insert(id) {
            return Err(CheckoutError::AttemptInFlight);
        }
        Ok(Self { set, id })
    }
}

impl Drop for AttemptSlot<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use crate::payments::{Confirmation, IntentHandle, IntentStatus};

    use super::*;

    /// Records the order in which external legs were observed.
    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    fn log(calls: &CallLog, leg: &'static str) {
        calls.lock().unwrap().push(leg);
    }

    struct MockGateway {
        calls: CallLog,
        init_calls: AtomicUsize,
        reconcile_calls: AtomicUsize,
        /// Reject initialization with this envelope message, if set.
        reject_init: Option<(u16, String)>,
        /// Fail this many reconcile calls before accepting.
        fail_reconciles: AtomicUsize,
        last_outcome: Mutex<Option<PaymentOutcome>>,
    }

    impl MockGateway {
        fn new(calls: CallLog) -> Self {
            Self {
                calls,
                init_calls: AtomicUsize::new(0),
                reconcile_calls: AtomicUsize::new(0),
                reject_init: None,
                fail_reconciles: AtomicUsize::new(0),
                last_outcome: Mutex::new(None),
            }
        }
    }

    impl PaymentGateway for Arc<MockGateway> {
        async fn initialize_payment(
            &self,
            _token: &str,
            _order_id: OrderId,
            _amount: Money,
        ) -> Result<IntentHandle, ApiError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            log(&self.calls, "initialize");
            if let Some((code, message)) = &self.reject_init {
                return Err(ApiError::Rejected {
                    code: *code,
                    message: message.clone(),
                });
            }
            Ok(IntentHandle::new("pi_abc_secret_123".to_string()))
        }

        async fn reconcile_payment(
            &self,
            _token: &str,
            outcome: &PaymentOutcome,
        ) -> Result<(), ApiError> {
            self.reconcile_calls.fetch_add(1, Ordering::SeqCst);
            log(&self.calls, "reconcile");
            *self.last_outcome.lock().unwrap() = Some(outcome.clone());
            let remaining = self.fail_reconciles.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_reconciles.store(remaining - 1, Ordering::SeqCst);
                return Err(ApiError::MissingData);
            }
            Ok(())
        }
    }

    struct MockProcessor {
        calls: CallLog,
        confirm_calls: AtomicUsize,
        result: Result<Confirmation, String>,
        /// When set, confirm blocks here until notified (re-entrancy tests).
        hold: Option<Arc<Notify>>,
        /// Signalled when confirm has been entered.
        entered: Arc<Notify>,
    }

    impl MockProcessor {
        fn confirming(calls: CallLog, transaction_id: &str, status: IntentStatus) -> Self {
            Self {
                calls,
                confirm_calls: AtomicUsize::new(0),
                result: Ok(Confirmation {
                    transaction_id: transaction_id.to_string(),
                    status,
                }),
                hold: None,
                entered: Arc::new(Notify::new()),
            }
        }

        fn failing(calls: CallLog, message: &str) -> Self {
            Self {
                calls,
                confirm_calls: AtomicUsize::new(0),
                result: Err(message.to_string()),
                hold: None,
                entered: Arc::new(Notify::new()),
            }
        }
    }

    impl CardProcessor for Arc<MockProcessor> {
        async fn confirm(
            &self,
            _handle: &IntentHandle,
            _payment_method: &str,
        ) -> Result<Confirmation, ProcessorError> {
            self.confirm_calls.fetch_add(1, Ordering::SeqCst);
            log(&self.calls, "confirm");
            self.entered.notify_one();
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            match &self.result {
                Ok(confirmation) => Ok(confirmation.clone()),
                Err(message) => Err(ProcessorError::Api {
                    status: 402,
                    message: message.clone(),
                }),
            }
        }
    }

    fn request(order_id: i64, cents: i64) -> CheckoutRequest {
        CheckoutRequest {
            order_id: OrderId::new(order_id),
            amount: Money::from_cents(cents),
            payment_method: "pm_card".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_attempt_reconciles_true_and_succeeds() {
        // Scenario A: init ok, processor succeeds with tx_1.
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_1",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor.clone());

        let outcome = orchestrator
            .run("token", request(1, 2500))
            .await
            .expect("terminal outcome");

        assert!(outcome.success);
        assert_eq!(outcome.transaction_id, "tx_1");

        let reconciled = gateway.last_outcome.lock().unwrap().clone().unwrap();
        assert_eq!(reconciled.order_id, OrderId::new(1));
        assert_eq!(reconciled.amount, Money::from_cents(2500));
        assert_eq!(reconciled.transaction_id, "tx_1");
        assert!(reconciled.success);
        assert_eq!(reconciled.failure_reason, None);

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["initialize", "confirm", "reconcile"]
        );
    }

    #[tokio::test]
    async fn test_init_rejection_aborts_before_processor() {
        // Scenario B: backend init returns a 400 envelope.
        let calls: CallLog = CallLog::default();
        let mut gateway = MockGateway::new(calls.clone());
        gateway.reject_init = Some((400, "Payment is already completed".to_string()));
        let gateway = Arc::new(gateway);
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_never",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor.clone());

        let err = orchestrator
            .run("token", request(1, 2500))
            .await
            .expect_err("init rejection");

        assert!(matches!(err, CheckoutError::Initialize(_)));
        assert_eq!(err.user_message(), "Payment is already completed");
        assert_eq!(processor.confirm_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.reconcile_calls.load(Ordering::SeqCst), 0);
        assert_eq!(*calls.lock().unwrap(), vec!["initialize"]);
    }

    #[tokio::test]
    async fn test_non_succeeded_status_reconciles_false() {
        // Scenario C: processor settles on requires_action with tx_2.
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_2",
            IntentStatus::RequiresAction,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor.clone());

        let outcome = orchestrator
            .run("token", request(2, 1000))
            .await
            .expect("attempt still completes");

        // A definite non-successful status is terminal, not an error.
        assert!(!outcome.success);

        let reconciled = gateway.last_outcome.lock().unwrap().clone().unwrap();
        assert!(!reconciled.success);
        assert_eq!(reconciled.transaction_id, "tx_2");
        assert_eq!(
            reconciled.failure_reason.as_deref(),
            Some("payment status: requires_action")
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["initialize", "confirm", "reconcile"]
        );
    }

    #[tokio::test]
    async fn test_processor_error_skips_reconciliation() {
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let processor = Arc::new(MockProcessor::failing(calls.clone(), "Your card was declined."));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor.clone());

        let err = orchestrator
            .run("token", request(3, 500))
            .await
            .expect_err("processor rejection");

        assert!(matches!(err, CheckoutError::Processor(_)));
        assert_eq!(err.user_message(), "Your card was declined.");
        // The processor owns this failure; no reconciliation call is made.
        assert_eq!(gateway.reconcile_calls.load(Ordering::SeqCst), 0);
        assert_eq!(*calls.lock().unwrap(), vec!["initialize", "confirm"]);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_before_any_call() {
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor);

        let err = orchestrator
            .run("token", request(4, 0))
            .await
            .expect_err("invalid amount");

        assert!(matches!(err, CheckoutError::InvalidAmount));
        assert_eq!(gateway.init_calls.load(Ordering::SeqCst), 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_retry_recovers() {
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        gateway.fail_reconciles.store(1, Ordering::SeqCst);
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_5",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor);

        let outcome = orchestrator
            .run("token", request(5, 700))
            .await
            .expect("retry should recover");

        assert!(outcome.success);
        assert_eq!(gateway.reconcile_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reconcile_failure_after_charge_is_distinct() {
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        gateway.fail_reconciles.store(2, Ordering::SeqCst);
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_6",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor);

        let err = orchestrator
            .run("token", request(6, 700))
            .await
            .expect_err("reconciliation exhausted");

        // A dangling charge is never reported as "payment failed".
        assert!(err.is_dangling_charge());
        assert!(err.user_message().contains("charged"));
        assert_eq!(gateway.reconcile_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reentrant_submit_runs_one_initialize() {
        // Two rapid submits for the same order: exactly one initialize call.
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let hold = Arc::new(Notify::new());
        let mut processor = MockProcessor::confirming(calls.clone(), "tx_7", IntentStatus::Succeeded);
        processor.hold = Some(hold.clone());
        let entered = processor.entered.clone();
        let processor = Arc::new(processor);

        let orchestrator = Arc::new(CheckoutOrchestrator::new(gateway.clone(), processor));

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run("token", request(7, 900)).await })
        };

        // Wait until the first attempt is parked inside the processor leg.
        entered.notified().await;

        let second = orchestrator.run("token", request(7, 900)).await;
        assert!(matches!(second, Err(CheckoutError::AttemptInFlight)));

        hold.notify_one();
        let first = first.await.expect("join").expect("first attempt completes");
        assert!(first.success);

        assert_eq!(gateway.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.reconcile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slot_released_after_terminal_state() {
        let calls: CallLog = CallLog::default();
        let gateway = Arc::new(MockGateway::new(calls.clone()));
        let processor = Arc::new(MockProcessor::confirming(
            calls.clone(),
            "tx_8",
            IntentStatus::Succeeded,
        ));
        let orchestrator = CheckoutOrchestrator::new(gateway.clone(), processor);

        orchestrator
            .run("token", request(8, 100))
            .await
            .expect("first attempt");
        // The slot is free again once the attempt is terminal.
        orchestrator
            .run("token", request(8, 100))
            .await
            .expect("second attempt");

        assert_eq!(gateway.init_calls.load(Ordering::SeqCst), 2);
    }
}
