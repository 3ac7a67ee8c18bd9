//! Admin customer queries.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{CustomerId, CustomerKind};
use tinta_storefront::db::RepositoryError;

use crate::error::AdminError;
use crate::validate::{MAX_LIST_ROWS, like_pattern, sanitize_search};

/// One row of the admin customer table.
#[derive(Debug, Clone)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub kind: CustomerKind,
    pub email: Option<String>,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Admin-side customer operations.
pub struct AdminCustomers<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminCustomers<'a> {
    /// Create an admin customer query handle.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List customers newest first, with an optional sanitized search
    /// over name, email, and id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Repository` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<CustomerSummary>, AdminError> {
        let pattern = search
            .and_then(sanitize_search)
            .map(|term| like_pattern(&term));

        let rows = sqlx::query(
            "SELECT id, kind, email, full_name, is_admin, created_at \
             FROM customers \
             WHERE ($1::text IS NULL \
                    OR full_name ILIKE $1 ESCAPE '\\' \
                    OR email ILIKE $1 ESCAPE '\\' \
                    OR id::text ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
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

    /// Grant or revoke the admin flag. This is the only place the flag is
    /// mutated besides the CLI, which calls through here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist,
    /// `AdminError::Repository` for other database errors.
    pub async fn set_admin(&self, id: CustomerId, is_admin: bool) -> Result<(), AdminError> {
        let result = sqlx::query(
            "UPDATE customers SET is_admin = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(is_admin)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }

        tracing::info!(customer_id = %id, is_admin, "admin flag changed");
        Ok(())
    }
}

fn map_summary(row: &PgRow) -> Result<CustomerSummary, RepositoryError> {
    let kind_raw: String = row.try_get("kind")?;
    let kind: CustomerKind = kind_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid customer kind: {e}")))?;

    Ok(CustomerSummary {
        id: CustomerId::new(row.try_get("id")?),
        kind,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        is_admin: row.try_get("is_admin")?,
        created_at: row.try_get("created_at")?,
    })
}
