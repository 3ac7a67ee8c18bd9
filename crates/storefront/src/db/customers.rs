//! Customer repository.
//!
//! Registered customers carry a unique email (partial unique index); guest
//! customers are explicit `kind = 'guest'` rows with no email, created at
//! checkout for unauthenticated buyers.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tinta_core::{CustomerId, CustomerKind, Email};

use super::RepositoryError;
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str =
    "id, kind, email, full_name, phone, address, is_admin, created_at, updated_at";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_customer).transpose()
    }

    /// Get a registered customer by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE email = $1 AND kind = 'registered'"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_customer).transpose()
    }

    /// Create a registered customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_registered(
        &self,
        email: &Email,
        full_name: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO customers (kind, email, full_name) \
             VALUES ('registered', $1, $2) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(full_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write_error(e, "email already exists"))?;

        map_customer(&row)
    }

    /// Create an explicit guest customer (no email) for an unauthenticated
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::PermissionDenied` if the store's access
    /// policy rejects the insert. Returns `RepositoryError::Database` for
    /// other database errors.
    pub async fn create_guest(
        &self,
        full_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO customers (kind, full_name, phone, address) \
             VALUES ('guest', $1, $2, $3) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(full_name)
        .bind(phone)
        .bind(address)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write_error(e, "guest conflict"))?;

        map_customer(&row)
    }

    /// Update a customer's profile with shipping info provided at checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: CustomerId,
        full_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE customers \
             SET full_name = $2, phone = $3, address = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(full_name)
        .bind(phone)
        .bind(address)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => map_customer(&r),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Map a database row to a [`Customer`].
pub(crate) fn map_customer(row: &PgRow) -> Result<Customer, RepositoryError> {
    let kind_raw: String = row.try_get("kind")?;
    let kind: CustomerKind = kind_raw
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid customer kind: {e}")))?;

    let email_raw: Option<String> = row.try_get("email")?;
    let email = email_raw
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(Customer {
        id: CustomerId::new(row.try_get("id")?),
        kind,
        email,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        is_admin: row.try_get("is_admin")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
