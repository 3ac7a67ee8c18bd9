//! Database-backed checkout tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p tinta-cli -- migrate)
//! - `TINTA_TEST_DATABASE_URL` (or `TINTA_DATABASE_URL`) set
//!
//! Run with: cargo test -p tinta-integration-tests -- --ignored

use rust_decimal::Decimal;
use serde_json::json;

use tinta_core::{CartItem, CartLineId, CartLineKind, PaperType, PaymentMethod, PrintOptions, PrintSize};
use tinta_storefront::db::{OrderRepository, ProductRepository};
use tinta_storefront::services::checkout::{Checkout, CheckoutError, ShippingDetails};
use tinta_storefront::services::settings::{SHIPPING_KEY, SettingsService};

use tinta_integration_tests::{insert_product, order_count, product_line, test_pool};

fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        full_name: "Maria Quispe".to_owned(),
        address: "Av. Arequipa 1234, Lima".to_owned(),
        phone: "987654321".to_owned(),
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

/// Pin shipping settings to threshold 100 / cost 15 so totals are
/// deterministic regardless of what other tests or seeds have written.
async fn pin_shipping(settings: &SettingsService) {
    settings
        .set(
            SHIPPING_KEY,
            &json!({ "free_shipping_threshold": "100", "shipping_cost": "15" }),
        )
        .await
        .expect("failed to write shipping settings");
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_print_only_cart_creates_no_order() {
    let pool = test_pool().await;
    let settings = SettingsService::new(pool.clone());
    let checkout = Checkout::new(&pool, &settings);

    let before = order_count(&pool).await;

    let cart = vec![print_line(), print_line()];
    let result = checkout
        .submit(&cart, &shipping_details(), PaymentMethod::Yape, None)
        .await;

    assert!(matches!(result, Err(CheckoutError::NoProductItems)));
    assert_eq!(order_count(&pool).await, before);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_insufficient_stock_aborts_and_leaves_stock_untouched() {
    let pool = test_pool().await;
    let settings = SettingsService::new(pool.clone());
    let checkout = Checkout::new(&pool, &settings);

    let product_id = insert_product(&pool, Decimal::from(50), 5).await;
    let before = order_count(&pool).await;

    let cart = vec![product_line(product_id, Decimal::from(50), 6)];
    let result = checkout
        .submit(&cart, &shipping_details(), PaymentMethod::Yape, None)
        .await;

    match result {
        Err(CheckoutError::InsufficientStock(shortages)) => {
            assert_eq!(shortages.len(), 1);
            let shortage = shortages.first().expect("shortage missing");
            assert_eq!(shortage.available, 5);
            assert_eq!(shortage.requested, 6);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(order_count(&pool).await, before);

    let product = ProductRepository::new(&pool)
        .get(product_id)
        .await
        .expect("product query failed")
        .expect("product vanished");
    assert_eq!(product.stock, 5);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_stock_decrement_floors_at_zero() {
    let pool = test_pool().await;

    let product_id = insert_product(&pool, Decimal::from(10), 3).await;

    let remaining = ProductRepository::new(&pool)
        .decrement_stock(product_id, 5)
        .await
        .expect("decrement failed");

    assert_eq!(remaining, 0);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_guest_checkout_end_to_end() {
    let pool = test_pool().await;
    let settings = SettingsService::new(pool.clone());
    pin_shipping(&settings).await;
    let checkout = Checkout::new(&pool, &settings);

    let product_id = insert_product(&pool, Decimal::from(50), 10).await;

    // Subtotal 100 meets the threshold exactly, so shipping is free.
    let cart = vec![product_line(product_id, Decimal::from(50), 2)];
    let outcome = checkout
        .submit(&cart, &shipping_details(), PaymentMethod::Yape, None)
        .await
        .expect("checkout failed");

    assert_eq!(outcome.totals.subtotal, Decimal::from(100));
    assert_eq!(outcome.totals.shipping, Decimal::ZERO);
    assert_eq!(outcome.totals.total, Decimal::from(100));
    assert!(outcome.warnings.is_empty());

    let orders = OrderRepository::new(&pool);
    let order = orders
        .get(outcome.order_id)
        .await
        .expect("order query failed")
        .expect("order missing");
    assert_eq!(order.total_amount, Decimal::from(100));
    assert_eq!(order.payment_method, PaymentMethod::Yape);

    let items = orders.get_items(order.id).await.expect("items query failed");
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().expect("item missing").quantity, 2);

    let product = ProductRepository::new(&pool)
        .get(product_id)
        .await
        .expect("product query failed")
        .expect("product vanished");
    assert_eq!(product.stock, 8);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_mixed_cart_drops_print_lines_from_order() {
    let pool = test_pool().await;
    let settings = SettingsService::new(pool.clone());
    pin_shipping(&settings).await;
    let checkout = Checkout::new(&pool, &settings);

    let product_id = insert_product(&pool, Decimal::from(30), 10).await;

    let cart = vec![
        product_line(product_id, Decimal::from(30), 1),
        print_line(),
    ];
    let outcome = checkout
        .submit(&cart, &shipping_details(), PaymentMethod::Transfer, None)
        .await
        .expect("checkout failed");

    // Only the product line is charged: 30 + 15 shipping (below threshold).
    assert_eq!(outcome.totals.total, Decimal::from(45));

    let items = OrderRepository::new(&pool)
        .get_items(outcome.order_id)
        .await
        .expect("items query failed");
    assert_eq!(items.len(), 1);
    assert!(items.first().expect("item missing").print_job_id.is_none());
}
