//! Seed the catalog and default settings.
//!
//! Reads products from a YAML file, inserts them, and writes the default
//! `shipping` and `payment_methods` settings for any key not already set.

use std::path::Path;

use tracing::info;

use tinta_core::ShippingConfig;
use tinta_storefront::db::{ProductRepository, SettingsRepository};
use tinta_storefront::models::NewProduct;
use tinta_storefront::services::settings::{
    PAYMENT_METHODS_KEY, PaymentMethodsConfig, SHIPPING_KEY,
};

/// Seed products from `file_path` and fill in missing default settings.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// operation fails.
pub async fn run(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    // Parse and validate before touching the database.
    let content = tokio::fs::read_to_string(path).await?;
    let products: Vec<NewProduct> = serde_yaml::from_str(&content)?;
    info!(count = products.len(), "Parsed product file");

    let pool = super::connect().await?;

    let repository = ProductRepository::new(&pool);
    for new in &products {
        let product = repository.create(new).await?;
        info!("Inserted product: {} ({})", product.name, product.id);
    }

    let settings = SettingsRepository::new(&pool);

    if settings.get(SHIPPING_KEY).await?.is_none() {
        let value = serde_json::to_value(ShippingConfig::default())?;
        settings.set(SHIPPING_KEY, &value).await?;
        info!("Wrote default shipping settings");
    }

    if settings.get(PAYMENT_METHODS_KEY).await?.is_none() {
        let value = serde_json::to_value(PaymentMethodsConfig::default())?;
        settings.set(PAYMENT_METHODS_KEY, &value).await?;
        info!("Wrote default payment method settings");
    }

    info!("Seeding complete!");
    Ok(())
}
