//! Cached access to store configuration.
//!
//! Settings live in the `settings` table and change rarely (admin form
//! writes). Instead of a global event bus, consumers hold a
//! `SettingsService` handle injected at construction; reads go through a
//! short-lived cache and `refresh`/`refresh_all` give writers an explicit
//! way to drop stale entries after an update.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use tinta_core::ShippingConfig;

use crate::db::{RepositoryError, SettingsRepository};

/// Setting key for shipping parameters.
pub const SHIPPING_KEY: &str = "shipping";
/// Setting key for payment method toggles and account numbers.
pub const PAYMENT_METHODS_KEY: &str = "payment_methods";

/// How long a cached setting stays fresh.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// A single payment method's admin-controlled configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentMethodSetting {
    pub enabled: bool,
    /// Account or phone number shown to the buyer for manual payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Per-method payment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodsConfig {
    #[serde(default)]
    pub yape: PaymentMethodSetting,
    #[serde(default)]
    pub plin: PaymentMethodSetting,
    #[serde(default)]
    pub transfer: PaymentMethodSetting,
    #[serde(default)]
    pub card: PaymentMethodSetting,
}

impl Default for PaymentMethodsConfig {
    fn default() -> Self {
        // Manual wallets start enabled; card requires a processor and
        // stays off until the admin configures one.
        Self {
            yape: PaymentMethodSetting {
                enabled: true,
                account: None,
            },
            plin: PaymentMethodSetting {
                enabled: true,
                account: None,
            },
            transfer: PaymentMethodSetting {
                enabled: true,
                account: None,
            },
            card: PaymentMethodSetting {
                enabled: false,
                account: None,
            },
        }
    }
}

/// Injectable, cached settings reader.
#[derive(Clone)]
pub struct SettingsService {
    pool: PgPool,
    cache: Cache<String, JsonValue>,
}

impl SettingsService {
    /// Create a settings service backed by the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Cache::builder()
                .max_capacity(64)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Raw setting value for `key`, from cache or the database.
    ///
    /// Missing keys are not cached; callers fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_raw(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        if let Some(value) = self.cache.get(key).await {
            return Ok(Some(value));
        }

        let value = SettingsRepository::new(&self.pool).get(key).await?;
        if let Some(ref v) = value {
            self.cache.insert(key.to_owned(), v.clone()).await;
        }
        Ok(value)
    }

    /// Shipping parameters, falling back to defaults when unset or
    /// malformed (a broken settings row must not take checkout down).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shipping_config(&self) -> Result<ShippingConfig, RepositoryError> {
        let Some(value) = self.get_raw(SHIPPING_KEY).await? else {
            return Ok(ShippingConfig::default());
        };

        match serde_json::from_value(value) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(error = %e, "malformed shipping settings, using defaults");
                Ok(ShippingConfig::default())
            }
        }
    }

    /// Payment method toggles, falling back to defaults when unset or
    /// malformed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn payment_methods(&self) -> Result<PaymentMethodsConfig, RepositoryError> {
        let Some(value) = self.get_raw(PAYMENT_METHODS_KEY).await? else {
            return Ok(PaymentMethodsConfig::default());
        };

        match serde_json::from_value(value) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(error = %e, "malformed payment settings, using defaults");
                Ok(PaymentMethodsConfig::default())
            }
        }
    }

    /// Write a setting and drop its cached entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        SettingsRepository::new(&self.pool).set(key, value).await?;
        self.cache.invalidate(key).await;
        Ok(())
    }

    /// Drop one cached entry so the next read hits the database.
    pub async fn refresh(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every cached entry.
    pub fn refresh_all(&self) {
        self.cache.invalidate_all();
    }
}
