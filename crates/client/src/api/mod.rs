//! Storefront server API.
//!
//! [`StorefrontApi`] is the seam between client state and the network. The
//! HTTP implementation lives in [`http`]; an in-process backend for tests is
//! in `memory`.

mod http;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

use std::future::Future;

use paw_paradise_core::Product;
use paw_paradise_core::api::{
    AuthResponse, LoginRequest, LogoutResponse, OrderRequest, OrderResponse, SessionStatus,
    SignupRequest,
};

use crate::error::ApiError;

pub use http::HttpApi;

/// Operations the storefront server exposes.
///
/// Successful calls return the decoded body. A refused request comes back as
/// [`ApiError::Rejected`] carrying the server's message.
pub trait StorefrontApi: Send + Sync {
    /// Fetch the product catalog.
    fn catalog(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Ask who, if anyone, the current session belongs to.
    fn session(&self) -> impl Future<Output = Result<SessionStatus, ApiError>> + Send;

    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn signup(
        &self,
        request: &SignupRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<LogoutResponse, ApiError>> + Send;

    /// Submit an order for the logged-in user.
    fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderResponse, ApiError>> + Send;
}
