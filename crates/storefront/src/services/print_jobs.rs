//! Ad-hoc print job submission.
//!
//! Uploads the customer's file to object storage, prices the job from its
//! print options, and persists a pending record with a snapshot of the
//! customer's contact info. Progress is reported stage by stage so a UI
//! can show what the submission is currently doing.

use thiserror::Error;

use tinta_core::{CustomerId, Email, EmailError, PrintOptions, print_price};

use crate::db::{PrintJobRepository, RepositoryError};
use crate::models::{NewPrintJob, PrintJob};
use crate::storage::{StorageClient, StorageError, object_key};

/// A file handed over for printing.
#[derive(Debug, Clone)]
pub struct PrintUpload {
    /// Original file name, used to carry the extension into the object key.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Contact snapshot stored on the job.
#[derive(Debug, Clone)]
pub struct SubmitterCustomerInfo {
    /// Set when the submitter is an authenticated customer.
    pub customer_id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Stage a submission is currently in, reported through `on_progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    /// The file is being uploaded to object storage.
    Uploading,
    /// The job record is being written.
    Saving,
}

impl SubmitStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Saving => "saving",
        }
    }
}

/// Errors that can abort a print job submission.
#[derive(Debug, Error)]
pub enum PrintJobError {
    /// The upload carries no bytes.
    #[error("no file provided")]
    EmptyFile,

    /// A required customer field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The contact email doesn't parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Upload failed; no record was created.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Record insert failed; the uploaded file is orphaned in storage.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Print job submission service.
pub struct PrintJobSubmitter<'a> {
    repository: PrintJobRepository<'a>,
    storage: &'a StorageClient,
}

impl<'a> PrintJobSubmitter<'a> {
    /// Create a submitter over the given repository and storage client.
    #[must_use]
    pub const fn new(repository: PrintJobRepository<'a>, storage: &'a StorageClient) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Submit a print job: upload the file, then persist the record.
    ///
    /// `on_progress` is called with each stage as it begins. A storage
    /// failure aborts before any record exists; a record-insert failure
    /// leaves the already-uploaded file orphaned in storage, which is
    /// logged and accepted rather than compensated.
    ///
    /// # Errors
    ///
    /// Returns a [`PrintJobError`] describing the failed step.
    pub async fn submit(
        &self,
        upload: &PrintUpload,
        options: PrintOptions,
        customer: &SubmitterCustomerInfo,
        mut on_progress: impl FnMut(SubmitStage),
    ) -> Result<PrintJob, PrintJobError> {
        validate_submission(upload, customer)?;
        let email = Email::parse(customer.email.trim())?;

        let options = options.clamped();
        let price = print_price(&options);

        on_progress(SubmitStage::Uploading);
        let key = object_key(&upload.file_name);
        let file_url = self
            .storage
            .upload(&key, upload.bytes.clone(), &upload.content_type)
            .await?;

        on_progress(SubmitStage::Saving);
        let new = NewPrintJob {
            customer_id: customer.customer_id,
            file_url,
            options,
            notes: customer.notes.clone(),
            price,
            customer_name: customer.name.trim().to_owned(),
            customer_email: email.into_inner(),
            customer_phone: customer.phone.clone(),
        };

        match self.repository.create(&new).await {
            Ok(job) => {
                tracing::info!(job_id = %job.id, price = %job.price, "print job submitted");
                Ok(job)
            }
            Err(e) => {
                tracing::warn!(
                    object_key = %key,
                    error = %e,
                    "print job insert failed; uploaded file left orphaned in storage"
                );
                Err(e.into())
            }
        }
    }
}

/// Structural validation before anything is uploaded.
fn validate_submission(
    upload: &PrintUpload,
    customer: &SubmitterCustomerInfo,
) -> Result<(), PrintJobError> {
    if upload.bytes.is_empty() {
        return Err(PrintJobError::EmptyFile);
    }
    if customer.name.trim().is_empty() {
        return Err(PrintJobError::MissingField("name"));
    }
    if customer.email.trim().is_empty() {
        return Err(PrintJobError::MissingField("email"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn upload() -> PrintUpload {
        PrintUpload {
            file_name: "tesis.pdf".to_owned(),
            content_type: "application/pdf".to_owned(),
            bytes: vec![1, 2, 3],
        }
    }

    fn customer() -> SubmitterCustomerInfo {
        SubmitterCustomerInfo {
            customer_id: None,
            name: "Jorge Mamani".to_owned(),
            email: "jorge@example.com".to_owned(),
            phone: Some("999888777".to_owned()),
            notes: None,
        }
    }

    #[test]
    fn test_rejects_empty_file() {
        let mut empty = upload();
        empty.bytes.clear();
        assert!(matches!(
            validate_submission(&empty, &customer()),
            Err(PrintJobError::EmptyFile)
        ));
    }

    #[test]
    fn test_rejects_blank_contact_fields() {
        let mut no_name = customer();
        no_name.name = "  ".to_owned();
        assert!(matches!(
            validate_submission(&upload(), &no_name),
            Err(PrintJobError::MissingField("name"))
        ));

        let mut no_email = customer();
        no_email.email = String::new();
        assert!(matches!(
            validate_submission(&upload(), &no_email),
            Err(PrintJobError::MissingField("email"))
        ));
    }

    #[test]
    fn test_accepts_complete_submission() {
        assert!(validate_submission(&upload(), &customer()).is_ok());
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(SubmitStage::Uploading.as_str(), "uploading");
        assert_eq!(SubmitStage::Saving.as_str(), "saving");
    }
}
