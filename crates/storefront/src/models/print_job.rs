//! Print job domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tinta_core::{CustomerId, PrintJobId, PrintJobStatus, PrintOptions};

/// A customer's request to have an uploaded file printed.
///
/// Carries a snapshot of the customer's contact info so the job stays
/// actionable even if the customer record changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: PrintJobId,
    /// Set when an authenticated customer submitted the job.
    pub customer_id: Option<CustomerId>,
    /// Public URL of the uploaded file in object storage.
    pub file_url: String,
    pub options: PrintOptions,
    pub notes: Option<String>,
    /// Price computed from the options at submission time.
    pub price: Decimal,
    pub status: PrintJobStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a print job.
#[derive(Debug, Clone)]
pub struct NewPrintJob {
    pub customer_id: Option<CustomerId>,
    pub file_url: String,
    pub options: PrintOptions,
    pub notes: Option<String>,
    pub price: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}
