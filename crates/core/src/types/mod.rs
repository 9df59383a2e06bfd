//! Core types for Paw Paradise.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod payment;
pub mod price;
pub mod product;

pub use email::{Email, EmailError};
pub use id::*;
pub use payment::{PaymentMethod, UnknownPaymentMethod};
pub use price::Price;
pub use product::{Catalog, CatalogError, Category, CategoryFilter, Product, UnknownCategory};
