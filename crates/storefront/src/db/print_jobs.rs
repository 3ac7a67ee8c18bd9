//! Print job repository.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{CustomerId, PaperType, PrintJobId, PrintJobStatus, PrintOptions, PrintSize};

use super::RepositoryError;
use crate::models::{NewPrintJob, PrintJob};

const PRINT_JOB_COLUMNS: &str = "id, customer_id, file_url, paper_type, color, size, copies, \
     double_sided, notes, price, status, customer_name, customer_email, customer_phone, \
     created_at, updated_at";

/// Repository for print job database operations.
pub struct PrintJobRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PrintJobRepository<'a> {
    /// Create a new print job repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a pending print job.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewPrintJob) -> Result<PrintJob, RepositoryError> {
        let options = new.options.clamped();
        let copies = i32::try_from(options.copies).unwrap_or(i32::MAX);

        let row = sqlx::query(&format!(
            "INSERT INTO print_jobs \
             (customer_id, file_url, paper_type, color, size, copies, double_sided, \
              notes, price, status, customer_name, customer_email, customer_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $11, $12) \
             RETURNING {PRINT_JOB_COLUMNS}"
        ))
        .bind(new.customer_id.map(CustomerId::as_uuid))
        .bind(&new.file_url)
        .bind(options.paper_type.as_str())
        .bind(options.color)
        .bind(options.size.as_str())
        .bind(copies)
        .bind(options.double_sided)
        .bind(&new.notes)
        .bind(new.price)
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(&new.customer_phone)
        .fetch_one(self.pool)
        .await?;

        map_print_job(&row)
    }

    /// Get a print job by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: PrintJobId) -> Result<Option<PrintJob>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRINT_JOB_COLUMNS} FROM print_jobs WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_print_job).transpose()
    }
}

/// Map a database row to a [`PrintJob`].
pub(crate) fn map_print_job(row: &PgRow) -> Result<PrintJob, RepositoryError> {
    let paper_raw: String = row.try_get("paper_type")?;
    let paper_type: PaperType = paper_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid paper type: {e}")))?;

    let size_raw: String = row.try_get("size")?;
    let size: PrintSize = size_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid print size: {e}")))?;

    let status_raw: String = row.try_get("status")?;
    let status: PrintJobStatus = status_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid print job status: {e}")))?;

    let copies: i32 = row.try_get("copies")?;
    let copies = u32::try_from(copies)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative copy count: {copies}")))?;

    Ok(PrintJob {
        id: PrintJobId::new(row.try_get("id")?),
        customer_id: row
            .try_get::<Option<uuid::Uuid>, _>("customer_id")?
            .map(CustomerId::new),
        file_url: row.try_get("file_url")?,
        options: PrintOptions {
            paper_type,
            color: row.try_get("color")?,
            size,
            copies,
            double_sided: row.try_get("double_sided")?,
        },
        notes: row.try_get("notes")?,
        price: row.try_get("price")?,
        status,
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        customer_phone: row.try_get("customer_phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
