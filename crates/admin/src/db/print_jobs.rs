//! Admin print job queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{PrintJobId, PrintJobStatus};
use tinta_storefront::db::{PrintJobRepository, RepositoryError};
use tinta_storefront::storage::{StorageClient, key_from_public_url};

use crate::error::AdminError;
use crate::validate::{MAX_LIST_ROWS, like_pattern, sanitize_search};

/// One row of the admin print job table.
#[derive(Debug, Clone)]
pub struct PrintJobSummary {
    pub id: PrintJobId,
    pub customer_name: String,
    pub customer_email: String,
    pub file_url: String,
    pub price: Decimal,
    pub status: PrintJobStatus,
    pub created_at: DateTime<Utc>,
}

/// Admin-side print job operations.
pub struct AdminPrintJobs<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminPrintJobs<'a> {
    /// Create an admin print job query handle.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List print jobs newest first, optionally filtered by status and a
    /// sanitized search over customer name, email, and job id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Repository` if the query fails.
    pub async fn list(
        &self,
        status: Option<PrintJobStatus>,
        search: Option<&str>,
    ) -> Result<Vec<PrintJobSummary>, AdminError> {
        let pattern = search
            .and_then(sanitize_search)
            .map(|term| like_pattern(&term));

        let rows = sqlx::query(
            "SELECT id, customer_name, customer_email, file_url, price, status, created_at \
             FROM print_jobs \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL \
                    OR customer_name ILIKE $2 ESCAPE '\\' \
                    OR customer_email ILIKE $2 ESCAPE '\\' \
                    OR id::text ILIKE $2 ESCAPE '\\') \
             ORDER BY created_at DESC \
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

    /// Move a print job to a new status, enforcing the transition table.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::IllegalTransition` when the job's current
    /// status does not allow the change, `RepositoryError::NotFound` if
    /// the job doesn't exist.
    pub async fn update_status(
        &self,
        id: PrintJobId,
        new_status: PrintJobStatus,
    ) -> Result<(), AdminError> {
        let current = PrintJobRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .status;

        if !current.can_transition_to(new_status) {
            return Err(AdminError::IllegalTransition {
                entity: "print job",
                from: current.to_string(),
                to: new_status.to_string(),
            });
        }

        sqlx::query("UPDATE print_jobs SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(new_status.as_str())
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from)?;

        tracing::info!(job_id = %id, from = %current, to = %new_status, "print job status changed");
        Ok(())
    }

    /// Delete a print job and best-effort remove its uploaded file.
    ///
    /// Storage cleanup failure is logged and tolerated; the record delete
    /// is what must succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the job doesn't exist,
    /// `AdminError::Repository` for other database errors.
    pub async fn delete(&self, id: PrintJobId, storage: &StorageClient) -> Result<(), AdminError> {
        let job = PrintJobRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM print_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from)?;

        if let Some(key) = key_from_public_url(&job.file_url) {
            if let Err(e) = storage.remove(&[key]).await {
                tracing::warn!(job_id = %id, error = %e, "companion file removal failed");
            }
        }

        tracing::info!(job_id = %id, "print job deleted");
        Ok(())
    }
}

fn map_summary(row: &PgRow) -> Result<PrintJobSummary, RepositoryError> {
    let status_raw: String = row.try_get("status")?;
    let status: PrintJobStatus = status_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid print job status: {e}")))?;

    Ok(PrintJobSummary {
        id: PrintJobId::new(row.try_get("id")?),
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        file_url: row.try_get("file_url")?,
        price: row.try_get("price")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}
