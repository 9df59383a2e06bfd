//! Order placement.

use sqlx::PgPool;
use tracing::{info, instrument};

use paw_paradise_core::validation::{self, ShippingDetails};
use paw_paradise_core::{Price, ValidationError};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::{CurrentUser, NewOrder, Order};

/// Errors that can occur while placing an order.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Validate and store an order for `user`.
    ///
    /// The total is taken as sent. It is checked to be positive but not
    /// recomputed from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for the first failing field, in form
    /// order, or `OrderError::Repository` if the insert fails.
    #[instrument(skip(self, shipping), fields(user_id = %user.id))]
    pub async fn place(
        &self,
        user: &CurrentUser,
        shipping: &ShippingDetails,
        total: Price,
        payment_method: &str,
    ) -> Result<Order, OrderError> {
        let valid = validation::order(shipping, total, payment_method)?;
        let order = self.orders.create(&NewOrder::new(user.id, valid)).await?;

        info!(
            order_id = %order.id,
            total = %order.total,
            payment_method = %order.payment_method,
            "Order placed"
        );
        Ok(order)
    }
}
