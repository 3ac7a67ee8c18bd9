//! Admin product queries.

use sqlx::PgPool;

use tinta_core::ProductId;
use tinta_storefront::db::{ProductRepository, RepositoryError, products::map_product};
use tinta_storefront::models::{NewProduct, Product};
use tinta_storefront::storage::{StorageClient, key_from_public_url};

use crate::error::AdminError;
use crate::validate::{MAX_LIST_ROWS, like_pattern, sanitize_search};

/// Admin-side product operations. Unlike the storefront's catalog reads,
/// these include inactive products.
pub struct AdminProducts<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminProducts<'a> {
    /// Create an admin product query handle.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products newest first, active or not, with an optional
    /// sanitized search over name, category, and id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Repository` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Product>, AdminError> {
        let pattern = search
            .and_then(sanitize_search)
            .map(|term| like_pattern(&term));

        let rows = sqlx::query(
            "SELECT id, name, description, price, category, stock, \
                    available_colors, available_sizes, is_active, image_url, \
                    created_at, updated_at \
             FROM products \
             WHERE ($1::text IS NULL \
                    OR name ILIKE $1 ESCAPE '\\' \
                    OR category ILIKE $1 ESCAPE '\\' \
                    OR id::text ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(pattern)
        .bind(MAX_LIST_ROWS)
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.iter()
            .map(map_product)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Create a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name or negative
    /// price/stock, `AdminError::Repository` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, AdminError> {
        validate_product(new)?;
        let product = ProductRepository::new(self.pool).create(new).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for invalid fields,
    /// `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(&self, id: ProductId, new: &NewProduct) -> Result<Product, AdminError> {
        validate_product(new)?;

        let row = sqlx::query(
            "UPDATE products \
             SET name = $2, description = $3, price = $4, category = $5, stock = $6, \
                 available_colors = $7, available_sizes = $8, is_active = $9, \
                 image_url = $10, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, description, price, category, stock, \
                       available_colors, available_sizes, is_active, image_url, \
                       created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(new.stock)
        .bind(&new.available_colors)
        .bind(&new.available_sizes)
        .bind(new.is_active)
        .bind(&new.image_url)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from)?;

        match row {
            Some(r) => Ok(map_product(&r)?),
            None => Err(RepositoryError::NotFound.into()),
        }
    }

    /// Delete a product and best-effort remove its image from storage.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::Conflict` if order items still reference it.
    pub async fn delete(&self, id: ProductId, storage: &StorageClient) -> Result<(), AdminError> {
        let product = ProductRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, "product is referenced by orders"))?;

        if let Some(key) = product.image_url.as_deref().and_then(key_from_public_url) {
            if let Err(e) = storage.remove(&[key]).await {
                tracing::warn!(product_id = %id, error = %e, "companion image removal failed");
            }
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

fn validate_product(new: &NewProduct) -> Result<(), AdminError> {
    if new.name.trim().is_empty() {
        return Err(AdminError::Validation("product name is required".to_owned()));
    }
    if new.price.is_sign_negative() {
        return Err(AdminError::Validation("price cannot be negative".to_owned()));
    }
    if new.stock < 0 {
        return Err(AdminError::Validation("stock cannot be negative".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> NewProduct {
        NewProduct {
            name: "Tarjetas personales".to_owned(),
            description: "500 unidades, couche 300g".to_owned(),
            price: Decimal::from(45),
            category: "tarjetas".to_owned(),
            stock: 20,
            available_colors: vec![],
            available_sizes: vec![],
            is_active: true,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_product() {
        assert!(validate_product(&product()).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut p = product();
        p.name = "  ".to_owned();
        assert!(matches!(
            validate_product(&p),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_price_and_stock() {
        let mut p = product();
        p.price = Decimal::from(-1);
        assert!(validate_product(&p).is_err());

        let mut p = product();
        p.stock = -5;
        assert!(validate_product(&p).is_err());
    }
}
