//! Database operations for the Tinta `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `products` - Sellable catalog with stock counts
//! - `customers` - Registered customers and explicit guest records
//! - `orders` / `order_items` - Purchase requests and their lines
//! - `print_jobs` - Ad-hoc print requests with file references
//! - `settings` - Keyed JSONB configuration (shipping, payment methods, ...)
//!
//! All mutation goes through discrete, independently-committed calls; the
//! checkout flow cleans up partial state with compensating deletes rather
//! than multi-statement transactions.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p tinta-cli -- migrate
//! ```

pub mod customers;
pub mod orders;
pub mod print_jobs;
pub mod products;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use print_jobs::PrintJobRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store's access policy rejected the write.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl RepositoryError {
    /// Classify an insert/update failure, separating policy rejections and
    /// unique-constraint conflicts from plain transport errors.
    #[must_use]
    pub fn from_write_error(err: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict_msg.to_owned());
            }
            // insufficient_privilege
            if db_err.code().as_deref() == Some("42501") {
                return Self::PermissionDenied(db_err.message().to_owned());
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
