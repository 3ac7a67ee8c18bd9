//! Order repository.
//!
//! Orders and their items are written through discrete inserts; the
//! checkout flow compensates for partial failure by deleting what it
//! already created (see `services::checkout`).

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{CustomerId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PrintJobId, ProductId};

use super::RepositoryError;
use crate::models::{NewOrderItem, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, customer_id, status, total_amount, shipping_address, \
     payment_method, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, product_id, print_job_id, quantity, unit_price, customization";

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

    /// Create a pending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        total_amount: Decimal,
        shipping_address: &str,
        payment_method: PaymentMethod,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO orders (customer_id, status, total_amount, shipping_address, payment_method) \
             VALUES ($1, 'pending', $2, $3, $4) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id.as_uuid())
        .bind(total_amount)
        .bind(shipping_address)
        .bind(payment_method.as_str())
        .fetch_one(self.pool)
        .await?;

        map_order(&row)
    }

    /// Insert one order item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_item(
        &self,
        order_id: OrderId,
        item: &NewOrderItem,
    ) -> Result<OrderItem, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO order_items \
             (order_id, product_id, print_job_id, quantity, unit_price, customization) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(order_id.as_uuid())
        .bind(item.product_id.map(ProductId::as_uuid))
        .bind(item.print_job_id.map(PrintJobId::as_uuid))
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(&item.customization)
        .fetch_one(self.pool)
        .await?;

        map_item(&row)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(map_order).transpose()
    }

    /// Get all items belonging to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_item).collect()
    }

    /// Delete an order and its items (compensating delete / admin cascade).
    ///
    /// Items are deleted with an explicit statement first; the calling layer
    /// cannot assume a foreign-key cascade exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

/// Map a database row to an [`Order`].
pub(crate) fn map_order(row: &PgRow) -> Result<Order, RepositoryError> {
    let status_raw: String = row.try_get("status")?;
    let status: OrderStatus = status_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid order status: {e}")))?;

    let payment_raw: String = row.try_get("payment_method")?;
    let payment_method: PaymentMethod = payment_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid payment method: {e}")))?;

    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        customer_id: CustomerId::new(row.try_get("customer_id")?),
        status,
        total_amount: row.try_get("total_amount")?,
        shipping_address: row.try_get("shipping_address")?,
        payment_method,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Map a database row to an [`OrderItem`].
pub(crate) fn map_item(row: &PgRow) -> Result<OrderItem, RepositoryError> {
    Ok(OrderItem {
        id: OrderItemId::new(row.try_get("id")?),
        order_id: OrderId::new(row.try_get("order_id")?),
        product_id: row
            .try_get::<Option<uuid::Uuid>, _>("product_id")?
            .map(ProductId::new),
        print_job_id: row
            .try_get::<Option<uuid::Uuid>, _>("print_job_id")?
            .map(PrintJobId::new),
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        customization: row.try_get("customization")?,
    })
}
