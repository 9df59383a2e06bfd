//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password signup and login
//! - `orders` - Order validation and persistence
//! - `catalog` - Product catalog loading with an in-memory cache

pub mod auth;
pub mod catalog;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogService, CatalogServiceError};
pub use orders::OrderService;
