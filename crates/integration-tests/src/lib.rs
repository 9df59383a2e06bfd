//! Integration tests for Paw Paradise.
//!
//! # Running Tests
//!
//! ```bash
//! # Client flows against the in-process backend
//! cargo test -p paw-paradise-integration-tests
//!
//! # HTTP tests against a running storefront (needs Postgres)
//! PAW_PARADISE_URL=http://localhost:3000 \
//!     cargo test -p paw-paradise-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `client_flows` - Whole shopping sessions through the client core
//! - `storefront_http` - Storefront JSON API over the network

use paw_paradise_client::{CheckoutForm, MemoryApi, Storefront};
use paw_paradise_core::Product;
use paw_paradise_core::validation::ShippingDetails;

/// Storefront URL for HTTP tests.
#[must_use]
pub fn base_url() -> String {
    std::env::var("PAW_PARADISE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Email nobody has registered yet.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@paws.io", uuid::Uuid::new_v4().simple())
}

/// A small catalog covering several categories.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    serde_json::from_value(serde_json::json!([
        {"id": 1, "name": "Salmon Kibble", "category": "food", "price": 12.5, "oldPrice": 15, "badge": "Sale", "emoji": "🐟"},
        {"id": 2, "name": "Squeaky Bone", "category": "toys", "price": 4.25, "emoji": "🦴"},
        {"id": 3, "name": "Cloud Bed", "category": "beds", "price": 40, "emoji": "🛏️"},
        {"id": 4, "name": "Reflective Collar", "category": "accessories", "price": 9.99, "emoji": "🦮"},
        {"id": 5, "name": "Oatmeal Shampoo", "category": "grooming", "price": 7.5, "emoji": "🧴"}
    ]))
    .unwrap_or_default()
}

/// In-process backend with the sample catalog and one registered shopper.
#[must_use]
pub fn backend() -> MemoryApi {
    MemoryApi::new()
        .with_catalog(sample_products())
        .with_account("Jane Doe", "jane@paws.io", "hunter22")
}

/// A started storefront sharing state with `api`.
pub async fn started(api: &MemoryApi) -> Storefront<MemoryApi> {
    let mut store = Storefront::new(api.clone());
    store.start().await;
    store
}

/// Shipping details that pass validation, paid on delivery.
#[must_use]
pub fn cod_form() -> CheckoutForm {
    CheckoutForm {
        shipping: ShippingDetails {
            name: "Jane Doe".to_owned(),
            phone: "+1 (555) 010-2030".to_owned(),
            address: "12 Bark Street, Springfield".to_owned(),
        },
        cardholder: String::new(),
    }
}

/// Shipping details plus a cardholder; the card itself is typed through
/// the edit commands.
#[must_use]
pub fn card_form() -> CheckoutForm {
    CheckoutForm {
        cardholder: "Jane Doe".to_owned(),
        ..cod_form()
    }
}
