//! Request middleware.
//!
//! Layers as `main.rs` stacks them, outermost first:
//!
//! - Sentry hub and transaction per request
//! - `TraceLayer` spans carrying the request id
//! - `x-request-id` assignment
//! - Server-side sessions
//! - Security response headers
//!
//! Rate limits are attached per route group in `routes`, and the auth
//! extractors read the shopper out of the session.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter, rate_limit_body};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_layer};
