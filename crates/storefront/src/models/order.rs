//! Order domain types.

use chrono::{DateTime, Utc};

use paw_paradise_core::validation::{ShippingDetails, ValidOrder};
use paw_paradise_core::{OrderId, PaymentMethod, Price, UserId};

/// An order ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub shipping: ShippingDetails,
    pub total: Price,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Attach a validated submission to the user placing it.
    #[must_use]
    pub fn new(user_id: UserId, order: ValidOrder) -> Self {
        Self {
            user_id,
            shipping: order.shipping,
            total: order.total,
            payment_method: order.payment_method,
        }
    }
}

/// A placed order (domain type).
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub shipping: ShippingDetails,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}
