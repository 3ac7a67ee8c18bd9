//! Database migration command.
//!
//! Applies the SQL files in `crates/storefront/migrations/` in lexical
//! order, recording each in sqlx's migration table. Exits non-zero on the
//! first failure.

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
