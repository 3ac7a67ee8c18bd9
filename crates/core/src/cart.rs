//! Ephemeral cart line items.
//!
//! Cart contents live only in session state on the caller's side; they are
//! never persisted as-is. At checkout each product line becomes an order
//! item, and any print lines still in the cart are dropped (print jobs go
//! through their own submission flow).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::PrintOptions;
use crate::types::{CartLineId, ProductId};

/// Defensive upper bound on a single line's quantity.
pub const MAX_LINE_QUANTITY: u32 = 1000;

/// What a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartLineKind {
    /// A catalog product.
    Product { product_id: ProductId },
    /// An ad-hoc print request carried in the cart.
    Print { options: PrintOptions },
}

/// A single line in a customer's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartLineId,
    #[serde(flatten)]
    pub kind: CartLineKind,
    /// Display name, snapshotted from the product or file at add time.
    pub name: String,
    /// Unit price at add time, in currency units.
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Free-form customization payload (engraving text, color choice, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<serde_json::Value>,
}

impl CartItem {
    /// The line's quantity clamped to `1..=MAX_LINE_QUANTITY`.
    #[must_use]
    pub const fn clamped_quantity(&self) -> u32 {
        if self.quantity == 0 {
            1
        } else if self.quantity > MAX_LINE_QUANTITY {
            MAX_LINE_QUANTITY
        } else {
            self.quantity
        }
    }

    /// Price of the whole line (`unit_price * quantity`, post-clamp).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.clamped_quantity())
    }

    /// Whether this line refers to a catalog product.
    #[must_use]
    pub const fn is_product(&self) -> bool {
        matches!(self.kind, CartLineKind::Product { .. })
    }

    /// The referenced product id, if this is a product line.
    #[must_use]
    pub const fn product_id(&self) -> Option<ProductId> {
        match self.kind {
            CartLineKind::Product { product_id } => Some(product_id),
            CartLineKind::Print { .. } => None,
        }
    }
}

/// Split a cart into product lines and print lines, preserving order.
#[must_use]
pub fn partition_lines(items: &[CartItem]) -> (Vec<&CartItem>, Vec<&CartItem>) {
    items.iter().partition(|item| item.is_product())
}
