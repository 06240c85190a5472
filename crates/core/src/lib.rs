//! Plateful Core - Shared types library.
//!
//! This crate provides common types used across all Plateful components:
//! - `storefront` - Customer-facing ordering site
//! - `admin` - Internal administration console
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session machinery. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, roles and
//!   statuses
//! - [`access`] - The route-guard decision function
//! - [`confirm`] - The confirmation gate for destructive actions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod confirm;
pub mod types;

pub use access::{Claims, Decision, Requirement};
pub use confirm::ConfirmGate;
pub use types::*;
