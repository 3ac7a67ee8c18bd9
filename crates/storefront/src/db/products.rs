//! Product repository for catalog and stock operations.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use tinta_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, stock, \
     available_colors, available_sizes, is_active, image_url, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    /// Get several products at once (stock check path).
    ///
    /// Missing IDs are simply absent from the result; the caller decides
    /// whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// List active products, newest first, capped at `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = TRUE ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// Insert a new product (seeding and admin create).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO products \
             (name, description, price, category, stock, available_colors, \
              available_sizes, is_active, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(new.stock)
        .bind(&new.available_colors)
        .bind(&new.available_sizes)
        .bind(new.is_active)
        .bind(&new.image_url)
        .fetch_one(self.pool)
        .await?;

        map_product(&row)
    }

    /// Atomically decrement a product's stock, flooring at zero.
    ///
    /// One statement, so two overlapping checkouts serialize inside the
    /// database instead of racing a read-then-write. Returns the new stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn decrement_stock(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<i32, RepositoryError> {
        let row = sqlx::query(
            "UPDATE products \
             SET stock = GREATEST(stock - $2, 0), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING stock",
        )
        .bind(id.as_uuid())
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(r.try_get("stock")?),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Map a database row to a [`Product`].
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a column is missing or mistyped.
pub fn map_product(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        stock: row.try_get("stock")?,
        available_colors: row.try_get("available_colors")?,
        available_sizes: row.try_get("available_sizes")?,
        is_active: row.try_get("is_active")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
