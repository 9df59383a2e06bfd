//! Paw Paradise Core - Shared types library.
//!
//! This crate provides common types used across all Paw Paradise components:
//! - `client` - Cart, favorites, session mirror and checkout state machine
//! - `storefront` - Session, authentication, order and catalog endpoints
//! - `cli` - Command-line tools for migrations and catalog checks
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no database access,
//! no HTTP clients. Both sides of the wire depend on it, so the client-side
//! pre-checks and the authoritative server-side checks run the same code.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, products and payment methods
//! - [`validation`] - Field rules for signup, login and checkout
//! - [`api`] - JSON request/response bodies exchanged with the storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationError;
