//! Session-related types.
//!
//! Types stored in the session for authentication state. The whole
//! [`CurrentUser`] value is replaced on login/logout and never mutated in
//! place; guards only read it.

use serde::{Deserialize, Serialize};

use plateful_core::{Claims, Email, UserId};

/// Session-stored user identity.
///
/// Carries the opaque backend token and the decoded claim set every guard
/// check reads.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Opaque backend session token, sent as a bearer token on API calls.
    token: String,
    /// Role claims and token expiry.
    pub claims: Claims,
}

impl CurrentUser {
    /// Create a session identity from a login response.
    #[must_use]
    pub const fn new(id: UserId, name: String, email: Email, token: String, claims: Claims) -> Self {
        Self {
            id,
            name,
            email,
            token,
            claims,
        }
    }

    /// The backend token for authenticated API calls.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token never appears in logs.
impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Session keys for authentication and interaction state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the confirmation gate.
    pub const CONFIRM_GATE: &str = "confirm_gate";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use plateful_core::Role;

    #[test]
    fn test_debug_redacts_token() {
        let user = CurrentUser::new(
            UserId::new(1),
            "Ada".to_string(),
            Email::parse("ada@example.com").expect("valid"),
            "jwt-token-value".to_string(),
            Claims::new(vec![Role::Customer], Utc::now() + Duration::hours(1)),
        );
        let debug = format!("{user:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("jwt-token-value"));
    }
}
