//! Tinta Core - Shared types and business arithmetic.
//!
//! This crate provides common types used across all Tinta components:
//! - `storefront` - Checkout, print-job submission, and catalog access
//! - `admin` - Back-office query layer for orders, products, jobs, and users
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. All pricing arithmetic lives here so
//! it can be tested without a running backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`cart`] - Ephemeral cart line items
//! - [`pricing`] - Print-job pricing and cart total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use cart::*;
pub use pricing::*;
pub use types::*;
