//! Database-backed admin layer tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p tinta-cli -- migrate)
//! - `TINTA_TEST_DATABASE_URL` (or `TINTA_DATABASE_URL`) set
//!
//! Run with: cargo test -p tinta-integration-tests -- --ignored

use rust_decimal::Decimal;
use uuid::Uuid;

use tinta_admin::{AdminCustomers, AdminError, AdminOrders};
use tinta_core::{OrderStatus, PaymentMethod};
use tinta_storefront::db::{CustomerRepository, OrderRepository};

use tinta_integration_tests::test_pool;

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_search_strips_markup_before_matching() {
    let pool = test_pool().await;

    let needle = format!("needle-{}", Uuid::new_v4());
    CustomerRepository::new(&pool)
        .create_guest(&needle, "999888777", "Av. Test 1")
        .await
        .expect("guest insert failed");

    let admin = AdminCustomers::new(&pool);

    // Angle brackets are stripped, so the wrapped term still matches.
    let found = admin
        .list(Some(&format!("<{needle}>")))
        .await
        .expect("search failed");
    assert!(found.iter().any(|c| c.full_name == needle));

    // Injected markup matches nothing once the brackets are gone.
    let found = admin
        .list(Some("<script>alert(1)</script>"))
        .await
        .expect("search failed");
    assert!(found.iter().all(|c| c.full_name != needle));
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_illegal_order_transition_is_rejected() {
    let pool = test_pool().await;

    let customer = CustomerRepository::new(&pool)
        .create_guest("Transition Test", "999888777", "Av. Test 2")
        .await
        .expect("guest insert failed");

    let order = OrderRepository::new(&pool)
        .create(
            customer.id,
            Decimal::from(10),
            "Av. Test 2",
            PaymentMethod::Transfer,
        )
        .await
        .expect("order insert failed");

    let admin = AdminOrders::new(&pool);

    // Fresh orders are pending; skipping straight to completed is illegal.
    let result = admin.update_status(order.id, OrderStatus::Completed).await;
    assert!(matches!(result, Err(AdminError::IllegalTransition { .. })));

    // The legal next step is accepted and persisted.
    admin
        .update_status(order.id, OrderStatus::Processing)
        .await
        .expect("legal transition rejected");

    let reloaded = OrderRepository::new(&pool)
        .get(order.id)
        .await
        .expect("order query failed")
        .expect("order missing");
    assert_eq!(reloaded.status, OrderStatus::Processing);
}
