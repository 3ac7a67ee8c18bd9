//! Tinta Storefront - customer-facing core for the print shop.
//!
//! This crate holds the business logic behind the public storefront:
//! checkout orchestration, print-job submission, and read access to the
//! catalog and settings. The UI layer (routing, rendering, session state)
//! lives elsewhere and calls in through [`services`].
//!
//! # Architecture
//!
//! - [`config`] - Environment configuration (database, object storage)
//! - [`db`] - Postgres repositories (sqlx); discrete calls, no cross-call
//!   transactions in the checkout flow - multi-step writes clean up with
//!   compensating deletes
//! - [`models`] - Domain records mapped from database rows
//! - [`storage`] - Object-store REST client for uploaded print files
//! - [`services`] - Checkout orchestrator, print-job submitter, settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod storage;
