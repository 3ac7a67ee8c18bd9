//! Print-job pricing and cart total computation.
//!
//! Pure arithmetic over plain records. The price of a print job is the base
//! per-page rate scaled by paper, color, size, copy count, and the
//! double-sided discount. Cart totals are a sum over line items plus a flat
//! shipping fee that is waived at the free-shipping threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;

/// Base price per printed page, in currency units (S/ 0.50).
const BASE_PAGE_PRICE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Paper stock for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaperType {
    #[default]
    Bond,
    Couche,
    Cartulina,
}

impl PaperType {
    /// Price multiplier for this stock.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::Bond => Decimal::ONE,
            // 1.5
            Self::Couche => Decimal::from_parts(15, 0, 0, false, 1),
            Self::Cartulina => Decimal::TWO,
        }
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bond => "bond",
            Self::Couche => "couche",
            Self::Cartulina => "cartulina",
        }
    }
}

impl std::fmt::Display for PaperType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaperType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bond" => Ok(Self::Bond),
            "couche" => Ok(Self::Couche),
            "cartulina" => Ok(Self::Cartulina),
            _ => Err(format!("invalid paper type: {s}")),
        }
    }
}

/// Page size for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrintSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PrintSize {
    /// Price multiplier for this size.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::A4 | Self::Letter => Decimal::ONE,
            // 1.5
            Self::Legal => Decimal::from_parts(15, 0, 0, false, 1),
            Self::A3 => Decimal::TWO,
        }
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::A3 => "a3",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

impl std::fmt::Display for PrintSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrintSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            _ => Err(format!("invalid print size: {s}")),
        }
    }
}

/// Options selected for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub paper_type: PaperType,
    /// Full color vs monochrome.
    pub color: bool,
    pub size: PrintSize,
    pub copies: u32,
    pub double_sided: bool,
}

impl PrintOptions {
    /// Returns a copy with `copies` clamped to at least 1.
    #[must_use]
    pub const fn clamped(mut self) -> Self {
        if self.copies == 0 {
            self.copies = 1;
        }
        self
    }
}

/// Price a print job from its options.
///
/// `price = 0.50 * paper * color * size * copies * double_sided`, where
/// color triples the price and double-sided applies a 0.9 discount.
/// `copies` is clamped to at least 1, so the result is always positive.
#[must_use]
pub fn print_price(options: &PrintOptions) -> Decimal {
    let options = options.clamped();

    let color_multiplier = if options.color {
        Decimal::from(3)
    } else {
        Decimal::ONE
    };
    let double_sided_multiplier = if options.double_sided {
        // 0.9
        Decimal::from_parts(9, 0, 0, false, 1)
    } else {
        Decimal::ONE
    };

    BASE_PAGE_PRICE
        * options.paper_type.multiplier()
        * color_multiplier
        * options.size.multiplier()
        * Decimal::from(options.copies)
        * double_sided_multiplier
}

/// Shipping parameters, loaded from the `settings` store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Flat fee charged below the threshold; never prorated.
    pub shipping_cost: Decimal,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(100),
            shipping_cost: Decimal::from(15),
        }
    }
}

/// Breakdown of a cart's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Compute subtotal, shipping, and total for a cart.
///
/// The subtotal sums every line regardless of kind. Shipping is zero once
/// the subtotal meets the free-shipping threshold (meeting it exactly
/// qualifies), otherwise the flat cost. Deterministic: same inputs, same
/// outputs.
#[must_use]
pub fn cart_totals(items: &[CartItem], shipping: &ShippingConfig) -> CartTotals {
    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();

    let shipping_fee = if subtotal >= shipping.free_shipping_threshold {
        Decimal::ZERO
    } else {
        shipping.shipping_cost
    };

    CartTotals {
        subtotal,
        shipping: shipping_fee,
        total: subtotal + shipping_fee,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLineKind;
    use crate::types::{CartLineId, ProductId};

    fn options(
        paper_type: PaperType,
        color: bool,
        size: PrintSize,
        copies: u32,
        double_sided: bool,
    ) -> PrintOptions {
        PrintOptions {
            paper_type,
            color,
            size,
            copies,
            double_sided,
        }
    }

    fn product_line(unit_price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: CartLineId::generate(),
            kind: CartLineKind::Product {
                product_id: ProductId::generate(),
            },
            name: "Afiches".to_owned(),
            unit_price,
            quantity,
            customization: None,
        }
    }

    #[test]
    fn test_base_price_single_page() {
        let price = print_price(&options(PaperType::Bond, false, PrintSize::A4, 1, false));
        assert_eq!(price, Decimal::new(50, 2));
    }

    #[test]
    fn test_double_sided_discount() {
        let price = print_price(&options(PaperType::Bond, false, PrintSize::A4, 1, true));
        assert_eq!(price, Decimal::new(45, 2));
    }

    #[test]
    fn test_ten_copies() {
        let price = print_price(&options(PaperType::Bond, false, PrintSize::A4, 10, false));
        assert_eq!(price, Decimal::new(500, 2));
    }

    #[test]
    fn test_all_multipliers_stack() {
        // 0.50 * cartulina(2) * color(3) * a3(2) * 4 copies * 0.9 = 21.60
        let price = print_price(&options(PaperType::Cartulina, true, PrintSize::A3, 4, true));
        assert_eq!(price, Decimal::new(2160, 2));
    }

    #[test]
    fn test_zero_copies_clamped_to_one() {
        let zero = print_price(&options(PaperType::Bond, false, PrintSize::A4, 0, false));
        let one = print_price(&options(PaperType::Bond, false, PrintSize::A4, 1, false));
        assert_eq!(zero, one);
    }

    #[test]
    fn test_monotonic_in_copies() {
        let mut last = Decimal::ZERO;
        for copies in 1..50 {
            let price = print_price(&options(PaperType::Couche, true, PrintSize::Legal, copies, false));
            assert!(price > last, "price must grow with copy count");
            last = price;
        }
    }

    #[test]
    fn test_double_sided_strictly_cheaper() {
        for paper in [PaperType::Bond, PaperType::Couche, PaperType::Cartulina] {
            let single = print_price(&options(paper, true, PrintSize::A3, 7, false));
            let double = print_price(&options(paper, true, PrintSize::A3, 7, true));
            assert!(double < single);
        }
    }

    #[test]
    fn test_totals_above_threshold() {
        let items = vec![product_line(Decimal::from(60), 2)];
        let totals = cart_totals(&items, &ShippingConfig::default());
        assert_eq!(totals.subtotal, Decimal::from(120));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(120));
    }

    #[test]
    fn test_totals_below_threshold() {
        let items = vec![product_line(Decimal::from(80), 1)];
        let totals = cart_totals(&items, &ShippingConfig::default());
        assert_eq!(totals.subtotal, Decimal::from(80));
        assert_eq!(totals.shipping, Decimal::from(15));
        assert_eq!(totals.total, Decimal::from(95));
    }

    #[test]
    fn test_threshold_met_exactly_ships_free() {
        let items = vec![product_line(Decimal::from(50), 2)];
        let totals = cart_totals(&items, &ShippingConfig::default());
        assert_eq!(totals.subtotal, Decimal::from(100));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(100));
    }

    #[test]
    fn test_empty_cart_still_charges_shipping_fee() {
        // Checkout rejects empty carts before totals matter; this just pins
        // down that the function itself is total.
        let totals = cart_totals(&[], &ShippingConfig::default());
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::from(15));
    }

    #[test]
    fn test_shipping_is_flat_never_fractional() {
        let config = ShippingConfig::default();
        for cents in [1_i64, 999, 5000, 9999] {
            let items = vec![product_line(Decimal::new(cents, 2), 1)];
            let totals = cart_totals(&items, &config);
            assert!(
                totals.shipping == Decimal::ZERO || totals.shipping == config.shipping_cost,
                "shipping must be zero or the full flat cost"
            );
            assert_eq!(totals.total, totals.subtotal + totals.shipping);
        }
    }

    #[test]
    fn test_totals_deterministic() {
        let items = vec![
            product_line(Decimal::new(1999, 2), 3),
            product_line(Decimal::new(550, 2), 1),
        ];
        let config = ShippingConfig::default();
        assert_eq!(cart_totals(&items, &config), cart_totals(&items, &config));
    }
}
