//! Domain records mapped from database rows.
//!
//! These are validated domain objects; repositories translate raw rows into
//! them, rejecting corrupt data instead of letting it leak through.

pub mod customer;
pub mod order;
pub mod print_job;
pub mod product;

pub use customer::Customer;
pub use order::{NewOrderItem, Order, OrderItem};
pub use print_job::{NewPrintJob, PrintJob};
pub use product::{NewProduct, Product};
