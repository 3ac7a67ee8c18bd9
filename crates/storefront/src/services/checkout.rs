//! Checkout orchestration.
//!
//! A checkout attempt is one sequential chain of discrete backend calls:
//! validate, resolve the buyer, check stock, create the order and its
//! items, then decrement stock. There is no cross-call transaction; if the
//! chain fails after the order row exists, the order is compensating-deleted
//! before the error surfaces. A stock-decrement failure after the items are
//! committed is deliberately non-fatal: the order stands and the failure is
//! reported as a warning for the operator to reconcile.

use std::collections::HashMap;

use sqlx::PgPool;
use thiserror::Error;

use tinta_core::{
    CartItem, CartTotals, CustomerId, OrderId, PaymentMethod, ProductId, cart_totals,
    partition_lines,
};

use crate::db::{
    CustomerRepository, OrderRepository, ProductRepository, RepositoryError,
};
use crate::models::{Customer, NewOrderItem};
use crate::services::settings::SettingsService;

/// Shipping details entered at checkout.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub phone: String,
}

/// One product the cart requests more of than the store has.
#[derive(Debug, Clone)]
pub struct StockShortage {
    pub product_id: ProductId,
    pub name: String,
    pub available: i32,
    pub requested: u32,
}

impl std::fmt::Display for StockShortage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (requested {}, available {})",
            self.name, self.requested, self.available
        )
    }
}

/// Errors that can abort a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines at all.
    #[error("cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// After dropping print lines, no catalog products remain. Print-only
    /// carts go through the print-job flow instead.
    #[error("order must contain at least one catalog product")]
    NoProductItems,

    /// One or more products can't cover the requested quantity. Reports
    /// every offending product, not just the first.
    #[error("insufficient stock: {}", format_shortages(.0))]
    InsufficientStock(Vec<StockShortage>),

    /// The store rejected creation of a guest buyer; the caller must sign in.
    #[error("authentication required to complete checkout")]
    AuthenticationRequired,

    /// Backend failure (with any partial state already cleaned up).
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn format_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckoutError {
    /// Message safe to show the buyer. Backend errors are sanitized;
    /// validation and stock errors are already human-readable.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Repository(_) => {
                "Something went wrong while processing your order. Please try again.".to_owned()
            }
            other => other.to_string(),
        }
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub totals: CartTotals,
    /// Non-fatal problems encountered after the order was committed
    /// (e.g. a stock decrement that failed and needs manual reconciling).
    pub warnings: Vec<String>,
}

/// The validated, clamped portion of a cart that will become an order.
#[derive(Debug, Clone)]
struct OrderPlan {
    /// Product lines with quantities clamped to the defensive bound.
    product_lines: Vec<CartItem>,
    /// Print lines present at checkout time; dropped from the order.
    dropped_prints: usize,
}

/// Checkout orchestrator.
pub struct Checkout<'a> {
    pool: &'a PgPool,
    settings: &'a SettingsService,
}

impl<'a> Checkout<'a> {
    /// Create a checkout orchestrator over the given pool and settings.
    #[must_use]
    pub const fn new(pool: &'a PgPool, settings: &'a SettingsService) -> Self {
        Self { pool, settings }
    }

    /// Run a full checkout attempt.
    ///
    /// `customer` is the authenticated buyer, if any; without one an
    /// explicit guest record is created. On success the caller clears its
    /// cart and shows the confirmation with the returned order id; the
    /// outcome's `warnings` are advisory and do not invalidate the order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`]; whenever an order row was created
    /// earlier in the failing attempt it has been deleted again.
    pub async fn submit(
        &self,
        cart: &[CartItem],
        shipping: &ShippingDetails,
        payment_method: PaymentMethod,
        customer: Option<CustomerId>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        // Step 1: fail fast on bad input; nothing has been written yet.
        validate_input(cart, shipping)?;

        // Step 2: partition before any write so a print-only cart never
        // creates an order row that needs compensating.
        let plan = build_plan(cart)?;
        if plan.dropped_prints > 0 {
            tracing::info!(
                count = plan.dropped_prints,
                "dropping print lines at checkout; print jobs are submitted separately"
            );
        }

        // Step 3: resolve the buyer.
        let buyer = self.resolve_buyer(customer, shipping).await?;

        // Step 4: aggregate stock check across every product line.
        let products = ProductRepository::new(self.pool);
        let product_ids: Vec<ProductId> = plan
            .product_lines
            .iter()
            .filter_map(CartItem::product_id)
            .collect();
        let fetched = products.get_many(&product_ids).await?;
        let stock_by_id: HashMap<ProductId, (String, i32)> = fetched
            .into_iter()
            .map(|p| (p.id, (p.name, p.stock)))
            .collect();

        let shortages = find_shortages(&plan.product_lines, &stock_by_id);
        if !shortages.is_empty() {
            return Err(CheckoutError::InsufficientStock(shortages));
        }

        // Step 5: totals over the lines that actually enter the order.
        let shipping_config = self.settings.shipping_config().await?;
        let totals = cart_totals(&plan.product_lines, &shipping_config);

        // Step 6: create the order, then its items. An item failure
        // orphans the order, so compensating-delete it before surfacing.
        let orders = OrderRepository::new(self.pool);
        let order = orders
            .create(buyer.id, totals.total, &shipping.address, payment_method)
            .await?;

        for line in &plan.product_lines {
            let item = NewOrderItem {
                product_id: line.product_id(),
                print_job_id: None,
                quantity: i32::try_from(line.clamped_quantity()).unwrap_or(i32::MAX),
                unit_price: line.unit_price,
                customization: line.customization.clone(),
            };

            if let Err(e) = orders.insert_item(order.id, &item).await {
                tracing::error!(order_id = %order.id, error = %e, "order item insert failed, rolling back order");
                if let Err(cleanup) = orders.delete(order.id).await {
                    tracing::error!(order_id = %order.id, error = %cleanup, "compensating delete failed; orphaned order left behind");
                }
                return Err(e.into());
            }
        }

        // Step 7: decrement stock. The order is committed at this point;
        // a failure here is reported, not rolled back.
        let mut warnings = Vec::new();
        for line in &plan.product_lines {
            let Some(product_id) = line.product_id() else {
                continue;
            };
            let quantity = i32::try_from(line.clamped_quantity()).unwrap_or(i32::MAX);
            if let Err(e) = products.decrement_stock(product_id, quantity).await {
                tracing::warn!(
                    order_id = %order.id,
                    product_id = %product_id,
                    error = %e,
                    "stock decrement failed after order commit; manual reconciliation needed"
                );
                warnings.push(format!(
                    "stock for \"{}\" could not be updated and needs manual review",
                    line.name
                ));
            }
        }

        tracing::info!(order_id = %order.id, total = %totals.total, "order created");

        Ok(CheckoutOutcome {
            order_id: order.id,
            totals,
            warnings,
        })
    }

    /// Upsert the authenticated buyer's profile, or create an explicit
    /// guest record for an unauthenticated checkout.
    async fn resolve_buyer(
        &self,
        customer: Option<CustomerId>,
        shipping: &ShippingDetails,
    ) -> Result<Customer, CheckoutError> {
        let customers = CustomerRepository::new(self.pool);

        match customer {
            Some(id) => Ok(customers
                .update_profile(id, &shipping.full_name, &shipping.phone, &shipping.address)
                .await?),
            None => {
                match customers
                    .create_guest(&shipping.full_name, &shipping.phone, &shipping.address)
                    .await
                {
                    Ok(guest) => Ok(guest),
                    Err(RepositoryError::PermissionDenied(msg)) => {
                        tracing::warn!(error = %msg, "guest checkout rejected by store policy");
                        Err(CheckoutError::AuthenticationRequired)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

/// Step 1: structural validation. Field-specific errors, checked in a
/// stable order so the UI highlights one field at a time.
fn validate_input(cart: &[CartItem], shipping: &ShippingDetails) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if shipping.full_name.trim().is_empty() {
        return Err(CheckoutError::MissingField("full_name"));
    }
    if shipping.address.trim().is_empty() {
        return Err(CheckoutError::MissingField("address"));
    }
    if shipping.phone.trim().is_empty() {
        return Err(CheckoutError::MissingField("phone"));
    }
    Ok(())
}

/// Step 2: split product lines from print lines and clamp quantities.
fn build_plan(cart: &[CartItem]) -> Result<OrderPlan, CheckoutError> {
    let (products, prints) = partition_lines(cart);

    if products.is_empty() {
        return Err(CheckoutError::NoProductItems);
    }

    let product_lines = products
        .into_iter()
        .map(|line| {
            let mut line = line.clone();
            line.quantity = line.clamped_quantity();
            line
        })
        .collect();

    Ok(OrderPlan {
        product_lines,
        dropped_prints: prints.len(),
    })
}

/// Step 4's pure half: every line whose requested quantity exceeds the
/// fetched stock, including products that vanished since the cart was
/// built (reported with zero available).
fn find_shortages(
    lines: &[CartItem],
    stock_by_id: &HashMap<ProductId, (String, i32)>,
) -> Vec<StockShortage> {
    let mut shortages = Vec::new();

    for line in lines {
        let Some(product_id) = line.product_id() else {
            continue;
        };
        let requested = line.clamped_quantity();

        match stock_by_id.get(&product_id) {
            Some((name, available)) => {
                if i64::from(requested) > i64::from(*available) {
                    shortages.push(StockShortage {
                        product_id,
                        name: name.clone(),
                        available: *available,
                        requested,
                    });
                }
            }
            None => shortages.push(StockShortage {
                product_id,
                name: line.name.clone(),
                available: 0,
                requested,
            }),
        }
    }

    shortages
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tinta_core::{CartLineId, CartLineKind, PaperType, PrintOptions, PrintSize};

    use super::*;

    fn product_line(product_id: ProductId, quantity: u32) -> CartItem {
        CartItem {
            id: CartLineId::generate(),
            kind: CartLineKind::Product { product_id },
            name: "Tarjetas personales".to_owned(),
            unit_price: Decimal::from(50),
            quantity,
            customization: None,
        }
    }

    fn print_line() -> CartItem {
        CartItem {
            id: CartLineId::generate(),
            kind: CartLineKind::Print {
                options: PrintOptions {
                    paper_type: PaperType::Bond,
                    color: false,
                    size: PrintSize::A4,
                    copies: 1,
                    double_sided: false,
                },
            },
            name: "tesis.pdf".to_owned(),
            unit_price: Decimal::new(50, 2),
            quantity: 1,
            customization: None,
        }
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Maria Quispe".to_owned(),
            address: "Av. Arequipa 1234, Lima".to_owned(),
            phone: "987654321".to_owned(),
        }
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        let result = validate_input(&[], &shipping());
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_validate_reports_specific_field() {
        let cart = vec![product_line(ProductId::generate(), 1)];

        let mut details = shipping();
        details.full_name = "   ".to_owned();
        assert!(matches!(
            validate_input(&cart, &details),
            Err(CheckoutError::MissingField("full_name"))
        ));

        let mut details = shipping();
        details.phone = String::new();
        assert!(matches!(
            validate_input(&cart, &details),
            Err(CheckoutError::MissingField("phone"))
        ));
    }

    #[test]
    fn test_plan_rejects_print_only_cart() {
        let cart = vec![print_line(), print_line()];
        assert!(matches!(
            build_plan(&cart),
            Err(CheckoutError::NoProductItems)
        ));
    }

    #[test]
    fn test_plan_drops_print_lines() {
        let cart = vec![
            product_line(ProductId::generate(), 2),
            print_line(),
            print_line(),
        ];
        let plan = build_plan(&cart).unwrap();
        assert_eq!(plan.product_lines.len(), 1);
        assert_eq!(plan.dropped_prints, 2);
    }

    #[test]
    fn test_plan_clamps_quantities() {
        let cart = vec![product_line(ProductId::generate(), 5000)];
        let plan = build_plan(&cart).unwrap();
        assert_eq!(plan.product_lines.first().unwrap().quantity, 1000);
    }

    #[test]
    fn test_shortages_reports_every_offender() {
        let id_a = ProductId::generate();
        let id_b = ProductId::generate();
        let id_c = ProductId::generate();
        let lines = vec![
            product_line(id_a, 6),
            product_line(id_b, 1),
            product_line(id_c, 3),
        ];

        let mut stock = HashMap::new();
        stock.insert(id_a, ("Afiches".to_owned(), 5));
        stock.insert(id_b, ("Volantes".to_owned(), 10));
        stock.insert(id_c, ("Stickers".to_owned(), 2));

        let shortages = find_shortages(&lines, &stock);
        assert_eq!(shortages.len(), 2);
        let names: Vec<&str> = shortages.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Afiches"));
        assert!(names.contains(&"Stickers"));
    }

    #[test]
    fn test_shortages_counts_vanished_product_as_zero_stock() {
        let id = ProductId::generate();
        let lines = vec![product_line(id, 1)];

        let shortages = find_shortages(&lines, &HashMap::new());
        assert_eq!(shortages.len(), 1);
        let shortage = shortages.first().unwrap();
        assert_eq!(shortage.available, 0);
        assert_eq!(shortage.requested, 1);
    }

    #[test]
    fn test_shortage_error_message_lists_all() {
        let err = CheckoutError::InsufficientStock(vec![
            StockShortage {
                product_id: ProductId::generate(),
                name: "Afiches".to_owned(),
                available: 5,
                requested: 6,
            },
            StockShortage {
                product_id: ProductId::generate(),
                name: "Stickers".to_owned(),
                available: 2,
                requested: 3,
            },
        ]);

        let message = err.to_string();
        assert!(message.contains("Afiches (requested 6, available 5)"));
        assert!(message.contains("Stickers (requested 3, available 2)"));
    }

    #[test]
    fn test_user_message_sanitizes_backend_errors() {
        let err = CheckoutError::Repository(RepositoryError::NotFound);
        assert!(!err.user_message().contains("not found"));

        let err = CheckoutError::EmptyCart;
        assert_eq!(err.user_message(), "cart is empty");
    }
}
