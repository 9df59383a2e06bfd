//! Paw Paradise client core.
//!
//! Owns everything a shopper's session holds between page loads: the catalog,
//! the cart, favorites, the mirror of the server session and the checkout
//! flow. Views are re-derived from that state after every command.
//!
//! # Architecture
//!
//! ```text
//! Command ──► Storefront::dispatch ──► CartLedger / FavoritesSet / AuthSession
//!                    │                          │
//!                    │                 CheckoutOrchestrator ──► StorefrontApi
//!                    ▼
//!              view::render ──► StoreView
//! ```
//!
//! The transport is abstracted behind [`StorefrontApi`]. [`HttpApi`] talks to
//! the storefront server with a cookie jar so the session cookie is sent on
//! every call; the `memory` feature adds an in-process backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use paw_paradise_client::{ClientConfig, Command, HttpApi, Storefront};
//!
//! let api = HttpApi::new(&ClientConfig::from_env()?)?;
//! let mut store = Storefront::new(api);
//! store.start().await;
//!
//! let view = store.dispatch(Command::AddToCart(ProductId::new(1))).await;
//! println!("{} items", view.header.cart_count);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod command;
pub mod config;
pub mod error;
pub mod favorites;
pub mod notice;
pub mod panels;
pub mod storefront;
pub mod view;

pub use api::{HttpApi, StorefrontApi};
pub use auth::{AuthSession, AuthState};
pub use cart::{CartLedger, CartLine};
pub use catalog::CatalogStore;
pub use checkout::{CardInput, CheckoutForm, CheckoutOrchestrator, CheckoutStage};
pub use command::Command;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError};
pub use favorites::{FavoritesSet, Toggled};
pub use notice::{Notice, NoticeLevel};
pub use panels::{Panel, Panels};
pub use storefront::Storefront;
pub use view::StoreView;

#[cfg(any(test, feature = "memory"))]
pub use api::memory::MemoryApi;
