//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (add unique ID to each request)
//! 3. CSP nonce (generate per-request nonce for the payment page script)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Security headers (CSP, isolation, etc.)
//! 6. Rate limiting (governor, auth routes)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireCustomer, RequireDelivery, clear_current_user,
    set_current_user,
};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
