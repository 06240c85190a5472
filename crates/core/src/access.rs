//! Route-guard decision logic.
//!
//! A guard decision is a pure function of the session's claims, the current
//! time and the route's capability requirement. Decisions are evaluated fresh
//! on every request and never cached past a session change; the web tier's
//! extractors are thin adapters over [`evaluate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Identity claims carried by an authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Role tags granted by the backend at login.
    pub roles: Vec<Role>,
    /// Token expiry; the session is unauthenticated past this instant.
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Create claims from a role set and an expiry instant.
    #[must_use]
    pub const fn new(roles: Vec<Role>, expires_at: DateTime<Utc>) -> Self {
        Self { roles, expires_at }
    }

    /// Whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the claim set carries the given role tag.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Capability requirement attached to a route.
///
/// Static configuration, not runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated account qualifies, regardless of role tags.
    Authenticated,
    /// The account must carry this specific role tag.
    Role(Role),
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected view unchanged.
    Grant,
    /// Do not render; navigate to the login entry point.
    RedirectToLogin,
}

/// Evaluate a capability requirement against the ambient session claims.
///
/// Grants iff claims are present, unexpired at `now`, and satisfy the
/// requirement. Role checks are independent, non-exclusive predicates: an
/// account holding any required tag passes, whatever else it holds.
#[must_use]
pub fn evaluate(
    claims: Option<&Claims>,
    now: DateTime<Utc>,
    requirement: Requirement,
) -> Decision {
    let Some(claims) = claims else {
        return Decision::RedirectToLogin;
    };

    if claims.is_expired(now) {
        return Decision::RedirectToLogin;
    }

    let satisfied = match requirement {
        Requirement::Authenticated => true,
        Requirement::Role(role) => claims.has_role(role),
    };

    if satisfied {
        Decision::Grant
    } else {
        Decision::RedirectToLogin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(roles: &[Role]) -> Claims {
        Claims::new(roles.to_vec(), Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_no_session_redirects() {
        assert_eq!(
            evaluate(None, Utc::now(), Requirement::Authenticated),
            Decision::RedirectToLogin
        );
        assert_eq!(
            evaluate(None, Utc::now(), Requirement::Role(Role::Admin)),
            Decision::RedirectToLogin
        );
    }

    #[test]
    fn test_expired_session_redirects() {
        let stale = Claims::new(vec![Role::Customer], Utc::now() - Duration::minutes(1));
        assert_eq!(
            evaluate(Some(&stale), Utc::now(), Requirement::Authenticated),
            Decision::RedirectToLogin
        );
    }

    #[test]
    fn test_authenticated_requirement_ignores_roles() {
        // Any non-empty role set satisfies "any authenticated user".
        for roles in [
            vec![Role::Customer],
            vec![Role::Admin],
            vec![Role::Delivery],
            vec![Role::Customer, Role::Delivery],
        ] {
            let c = claims(&roles);
            assert_eq!(
                evaluate(Some(&c), Utc::now(), Requirement::Authenticated),
                Decision::Grant
            );
        }
    }

    #[test]
    fn test_role_requirement_needs_exact_tag() {
        // A customer requesting an admin route is denied; the view never mounts.
        let customer = claims(&[Role::Customer]);
        assert_eq!(
            evaluate(Some(&customer), Utc::now(), Requirement::Role(Role::Admin)),
            Decision::RedirectToLogin
        );

        let admin = claims(&[Role::Admin]);
        assert_eq!(
            evaluate(Some(&admin), Utc::now(), Requirement::Role(Role::Admin)),
            Decision::Grant
        );
    }

    #[test]
    fn test_multi_role_any_required_tag_passes() {
        let courier_customer = claims(&[Role::Customer, Role::Delivery]);
        assert_eq!(
            evaluate(
                Some(&courier_customer),
                Utc::now(),
                Requirement::Role(Role::Delivery)
            ),
            Decision::Grant
        );
        assert_eq!(
            evaluate(
                Some(&courier_customer),
                Utc::now(),
                Requirement::Role(Role::Customer)
            ),
            Decision::Grant
        );
        assert_eq!(
            evaluate(
                Some(&courier_customer),
                Utc::now(),
                Requirement::Role(Role::Admin)
            ),
            Decision::RedirectToLogin
        );
    }

    #[test]
    fn test_decision_is_pure_of_inputs() {
        // Same inputs, same decision; a changed session changes the decision.
        let c = claims(&[Role::Customer]);
        let now = Utc::now();
        assert_eq!(
            evaluate(Some(&c), now, Requirement::Role(Role::Customer)),
            evaluate(Some(&c), now, Requirement::Role(Role::Customer)),
        );
        assert_eq!(
            evaluate(None, now, Requirement::Role(Role::Customer)),
            Decision::RedirectToLogin
        );
    }
}
