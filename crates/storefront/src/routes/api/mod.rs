//! JSON API consumed by the storefront client.

pub mod account;
pub mod catalog;
pub mod orders;

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection is rendered like every other failure
/// (400, `"Invalid JSON data"`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
