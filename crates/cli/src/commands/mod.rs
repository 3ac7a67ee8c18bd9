//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use tinta_storefront::db;

/// Connect to the database named by `TINTA_DATABASE_URL` (falling back to
/// `DATABASE_URL`).
///
/// # Errors
///
/// Returns an error when neither variable is set or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TINTA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "TINTA_DATABASE_URL not set")?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
