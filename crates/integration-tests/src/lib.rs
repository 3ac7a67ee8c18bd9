//! Integration tests for Tinta.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a database and apply migrations
//! cargo run -p tinta-cli -- migrate
//!
//! # Run the ignored, database-backed tests
//! cargo test -p tinta-integration-tests -- --ignored
//! ```
//!
//! Tests connect to `TINTA_TEST_DATABASE_URL` (falling back to
//! `TINTA_DATABASE_URL`). Each test creates its own uniquely-named rows
//! and never assumes an empty database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use tinta_core::{CartItem, CartLineId, CartLineKind, ProductId};
use tinta_storefront::db::{self, ProductRepository};
use tinta_storefront::models::NewProduct;

/// Connect to the test database.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails; these
/// tests are only run with `--ignored` against a prepared database.
pub async fn test_pool() -> PgPool {
    dotenvy::dotenv().ok();

    let url = std::env::var("TINTA_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("TINTA_DATABASE_URL"))
        .map(SecretString::from)
        .expect("TINTA_TEST_DATABASE_URL not set");

    db::create_pool(&url).await.expect("database unreachable")
}

/// Insert a product with a unique name and the given price and stock.
pub async fn insert_product(pool: &PgPool, price: Decimal, stock: i32) -> ProductId {
    let new = NewProduct {
        name: format!("test-product-{}", Uuid::new_v4()),
        description: "integration test fixture".to_owned(),
        price,
        category: "test".to_owned(),
        stock,
        available_colors: vec![],
        available_sizes: vec![],
        is_active: true,
        image_url: None,
    };

    ProductRepository::new(pool)
        .create(&new)
        .await
        .expect("product insert failed")
        .id
}

/// Cart line referencing a catalog product.
#[must_use]
pub fn product_line(product_id: ProductId, unit_price: Decimal, quantity: u32) -> CartItem {
    CartItem {
        id: CartLineId::generate(),
        kind: CartLineKind::Product { product_id },
        name: "test product".to_owned(),
        unit_price,
        quantity,
        customization: None,
    }
}

/// Count of order rows, for before/after assertions.
pub async fn order_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .expect("count query failed")
}
