//! Admin database operations over the storefront schema.
//!
//! Reads return flat summary rows shaped for admin tables (joined
//! customer info, capped row counts). Mutations validate before they
//! touch the database: status changes go through each entity's
//! transition table, deletes cascade explicitly, and record deletion
//! attempts best-effort cleanup of companion files in object storage.

pub mod customers;
pub mod orders;
pub mod print_jobs;
pub mod products;

pub use customers::{AdminCustomers, CustomerSummary};
pub use orders::{AdminOrders, OrderSummary};
pub use print_jobs::{AdminPrintJobs, PrintJobSummary};
pub use products::AdminProducts;
