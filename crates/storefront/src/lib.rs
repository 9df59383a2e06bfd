//! Paw Paradise Storefront library.
//!
//! Session, account, catalog and order API behind the storefront client. Kept
//! as a library so the router can be tested without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
