//! Order and order item domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tinta_core::{CustomerId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PrintJobId, ProductId};

/// A customer's purchase request.
///
/// Created atomically with at least one item; an order that ends up with
/// zero items is invalid and gets compensating-deleted by the checkout flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    /// Subtotal plus shipping at checkout time.
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item inside an order.
///
/// Exactly one of `product_id` / `print_job_id` is set, distinguishing a
/// catalog line from a print line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub print_job_id: Option<PrintJobId>,
    pub quantity: i32,
    /// Unit price snapshotted at checkout time.
    pub unit_price: Decimal,
    pub customization: Option<serde_json::Value>,
}

/// Input for inserting an order item.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub print_job_id: Option<PrintJobId>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub customization: Option<serde_json::Value>,
}
