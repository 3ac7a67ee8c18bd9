//! Admin order queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{OrderId, OrderStatus, PaymentMethod};
use tinta_storefront::db::{OrderRepository, RepositoryError};

use crate::error::AdminError;
use crate::validate::{MAX_LIST_ROWS, like_pattern, sanitize_search};

/// One row of the admin order table, with customer info joined in.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Admin-side order operations.
pub struct AdminOrders<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminOrders<'a> {
    /// Create an admin order query handle.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders newest first, optionally filtered by status and a
    /// sanitized search over customer name, email, and order id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Repository` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        search: Option<&str>,
    ) -> Result<Vec<OrderSummary>, AdminError> {
        let pattern = search
            .and_then(sanitize_search)
            .map(|term| like_pattern(&term));

        let rows = sqlx::query(
            "SELECT o.id, o.status, o.total_amount, o.payment_method, o.created_at, \
                    c.full_name AS customer_name, c.email AS customer_email \
             FROM orders o \
             JOIN customers c ON c.id = o.customer_id \
             WHERE ($1::text IS NULL OR o.status = $1) \
               AND ($2::text IS NULL \
                    OR c.full_name ILIKE $2 ESCAPE '\\' \
                    OR c.email ILIKE $2 ESCAPE '\\' \
                    OR o.id::text ILIKE $2 ESCAPE '\\') \
             ORDER BY o.created_at DESC \
             LIMIT $3",
        )
        .bind(status.map(|s| s.as_str().to_owned()))
        .bind(pattern)
        .bind(MAX_LIST_ROWS)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.iter()
            .map(map_summary)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Move an order to a new status, enforcing the transition table.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::IllegalTransition` when the order's current
    /// status does not allow the change, `RepositoryError::NotFound` if
    /// the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), AdminError> {
        let current = OrderRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .status;

        if !current.can_transition_to(new_status) {
            return Err(AdminError::IllegalTransition {
                entity: "order",
                from: current.to_string(),
                to: new_status.to_string(),
            });
        }

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(new_status.as_str())
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from)?;

        tracing::info!(order_id = %id, from = %current, to = %new_status, "order status changed");
        Ok(())
    }

    /// Delete an order together with its items.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Repository` if either delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), AdminError> {
        OrderRepository::new(self.pool).delete(id).await?;
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }
}

fn map_summary(row: &PgRow) -> Result<OrderSummary, RepositoryError> {
    let status_raw: String = row.try_get("status")?;
    let status: OrderStatus = status_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid order status: {e}")))?;

    let payment_raw: String = row.try_get("payment_method")?;
    let payment_method: PaymentMethod = payment_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid payment method: {e}")))?;

    Ok(OrderSummary {
        id: OrderId::new(row.try_get("id")?),
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        status,
        total_amount: row.try_get("total_amount")?,
        payment_method,
        created_at: row.try_get("created_at")?,
    })
}
