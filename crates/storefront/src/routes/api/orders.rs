//! Order submission endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use paw_paradise_core::api::OrderResponse;
use paw_paradise_core::validation::ShippingDetails;
use paw_paradise_core::{PaymentMethod, Price};

use super::ApiJson;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order body as received.
///
/// Looser than `OrderRequest`: missing fields and unknown payment methods must
/// reach validation so the shopper gets a field message, not a parse error.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderPayload {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub total: Option<Price>,
    pub payment_method: String,
}

impl Default for OrderPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            total: None,
            payment_method: PaymentMethod::default().as_str().to_owned(),
        }
    }
}

impl OrderPayload {
    fn shipping(&self) -> ShippingDetails {
        ShippingDetails {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// Place an order for the logged-in user.
///
/// POST /api/orders
///
/// The session is checked before the body is read. The total is trusted as
/// sent by the client (only checked to be positive); it is not recomputed
/// from the catalog.
///
/// # Errors
///
/// 401 with `requireLogin` without a session, 400 for the first broken field
/// rule.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(payload): ApiJson<OrderPayload>,
) -> Result<Json<OrderResponse>> {
    let order = state
        .orders()
        .place(
            &user,
            &payload.shipping(),
            payload.total.unwrap_or(Price::ZERO),
            &payload.payment_method,
        )
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("payment_method", order.payment_method.as_str())]),
    );

    Ok(Json(OrderResponse::placed(order.id)))
}
