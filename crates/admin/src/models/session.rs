//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state. The whole
//! [`CurrentAdmin`] value is replaced on login/logout and never mutated in
//! place.

use serde::{Deserialize, Serialize};

use plateful_core::{Claims, Email, UserId};

/// Session-stored admin identity.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's backend ID.
    pub id: UserId,
    /// Admin's display name.
    pub name: String,
    /// Admin's email address.
    pub email: Email,
    /// Opaque backend session token.
    token: String,
    /// Role claims and token expiry.
    pub claims: Claims,
}

impl CurrentAdmin {
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
impl std::fmt::Debug for CurrentAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentAdmin")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Session keys for admin authentication and interaction state.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the confirmation gate.
    pub const CONFIRM_GATE: &str = "confirm_gate";
}
