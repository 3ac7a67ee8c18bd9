//! Tinta admin - back-office query layer for the print shop.
//!
//! Every mutating operation validates its input before anything reaches
//! the database: IDs must parse as UUIDs, status values must be members
//! of their entity's enum, search strings are sanitized, and status
//! changes must be legal transitions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod error;
pub mod validate;

pub use db::{
    AdminCustomers, AdminOrders, AdminPrintJobs, AdminProducts, CustomerSummary, OrderSummary,
    PrintJobSummary,
};
pub use error::AdminError;
