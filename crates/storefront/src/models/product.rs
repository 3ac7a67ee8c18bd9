//! Catalog product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tinta_core::ProductId;

/// A sellable catalog product.
///
/// `stock` is mutated only by the checkout flow's decrement and by admin
/// edits; the database floors it at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in currency units.
    pub price: Decimal,
    /// Free-form category label (e.g. "tarjetas", "afiches").
    pub category: String,
    /// Remaining sellable quantity; never negative.
    pub stock: i32,
    pub available_colors: Vec<String>,
    pub available_sizes: Vec<String>,
    /// Inactive products are hidden from the storefront but kept for
    /// order history.
    pub is_active: bool,
    /// Public URL of the product image, if one was uploaded.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a product (seeding, admin create).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}
