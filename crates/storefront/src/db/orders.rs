//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use paw_paradise_core::validation::ShippingDetails;
use paw_paradise_core::{OrderId, Price, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order};

#[derive(FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    name: String,
    phone: String,
    address: String,
    total: Decimal,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let payment_method = row.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            shipping: ShippingDetails {
                name: row.name,
                phone: row.phone,
                address: row.address,
            },
            total: Price::new(row.total),
            payment_method,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and return it with its new ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign key violation when the user no longer exists).
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO storefront.orders (user_id, name, phone, address, total, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, phone, address, total, payment_method, created_at
            ",
        )
        .bind(order.user_id)
        .bind(&order.shipping.name)
        .bind(&order.shipping.phone)
        .bind(&order.shipping.address)
        .bind(Decimal::from(order.total))
        .bind(order.payment_method.as_str())
        .fetch_one(self.pool)
        .await?;

        Order::try_from(row)
    }
}
