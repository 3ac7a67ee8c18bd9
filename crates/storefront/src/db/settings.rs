//! Settings storage: a small keyed JSONB configuration store.
//!
//! Known keys: `shipping` (free-shipping threshold + flat cost),
//! `payment_methods` (per-method toggle + account number), `company`,
//! `receipt`. Each key is a singleton row; writes upsert.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};

use super::RepositoryError;

/// Repository for settings operations.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a setting value by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| r.try_get("value")).transpose().map_err(Into::into)
    }

    /// Set a setting value, inserting or replacing the key's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
