//! Confirmation gate for destructive actions.
//!
//! Irreversible operations (deletes, logout, account deactivation) are not
//! fired directly from their originating form; they are armed on the gate and
//! executed only after the user explicitly confirms. The gate holds at most
//! one pending action: arming again before resolution replaces the previous
//! one (last call wins, no queue). Confirming yields the armed action exactly
//! once; cancelling discards it. Either way the gate returns to idle.
//!
//! The gate itself performs no I/O. Callers store it in the session and
//! dispatch whatever action `confirm` yields.

use serde::{Deserialize, Serialize};

/// An armed confirmation prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pending<A> {
    /// Prompt title, e.g. "Delete category".
    pub title: String,
    /// Prompt body shown to the user.
    pub message: String,
    /// The action to dispatch if the user confirms.
    pub action: A,
}

/// Single-slot confirmation gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmGate<A> {
    pending: Option<Pending<A>>,
}

impl<A> Default for ConfirmGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmGate<A> {
    /// An idle gate with nothing armed.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the gate with a pending action, replacing any prior one.
    pub fn arm(&mut self, title: impl Into<String>, message: impl Into<String>, action: A) {
        self.pending = Some(Pending {
            title: title.into(),
            message: message.into(),
            action,
        });
    }

    /// Resolve the gate positively, yielding the armed action.
    ///
    /// Returns `None` if nothing was armed (e.g. a stale or duplicate
    /// confirmation request). The gate is idle afterwards in every case, so
    /// the action can never fire twice.
    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take().map(|p| p.action)
    }

    /// Resolve the gate negatively, discarding the armed action.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether an action is currently armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// The armed prompt, if any, for rendering.
    #[must_use]
    pub const fn pending(&self) -> Option<&Pending<A>> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    enum TestAction {
        DeleteThing(i64),
        Logout,
    }

    #[test]
    fn test_confirm_fires_exactly_once() {
        let mut gate = ConfirmGate::new();
        gate.arm("Logout", "Really log out?", TestAction::Logout);
        assert!(gate.is_armed());

        assert_eq!(gate.confirm(), Some(TestAction::Logout));
        assert!(!gate.is_armed());

        // A duplicate confirmation finds nothing to fire.
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn test_cancel_discards_without_firing() {
        let mut gate = ConfirmGate::new();
        gate.arm("Delete", "Really delete?", TestAction::DeleteThing(3));

        gate.cancel();
        assert!(!gate.is_armed());
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn test_rearming_replaces_pending_action() {
        let mut gate = ConfirmGate::new();
        gate.arm("Delete", "Delete #1?", TestAction::DeleteThing(1));
        gate.arm("Delete", "Delete #2?", TestAction::DeleteThing(2));

        // Last call wins; the first pending action is discarded, not queued.
        assert_eq!(gate.confirm(), Some(TestAction::DeleteThing(2)));
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn test_gate_never_left_armed_after_resolution() {
        let mut gate = ConfirmGate::new();

        gate.arm("a", "b", TestAction::Logout);
        let _ = gate.confirm();
        assert!(!gate.is_armed());

        gate.arm("a", "b", TestAction::Logout);
        gate.cancel();
        assert!(!gate.is_armed());
    }

    #[test]
    fn test_session_roundtrip() {
        let mut gate = ConfirmGate::new();
        gate.arm("Delete", "Really?", TestAction::DeleteThing(9));

        let json = serde_json::to_string(&gate).expect("serialize");
        let mut back: ConfirmGate<TestAction> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.confirm(), Some(TestAction::DeleteThing(9)));
    }
}
