//! Business services behind the storefront UI.
//!
//! - [`checkout`] - Orchestrates a checkout attempt end to end
//! - [`print_jobs`] - Uploads and registers ad-hoc print jobs
//! - [`settings`] - Cached, injectable access to store configuration

pub mod checkout;
pub mod print_jobs;
pub mod settings;

pub use checkout::{Checkout, CheckoutError, CheckoutOutcome, ShippingDetails, StockShortage};
pub use print_jobs::{PrintJobError, PrintJobSubmitter, PrintUpload, SubmitStage, SubmitterCustomerInfo};
pub use settings::{PaymentMethodSetting, PaymentMethodsConfig, SettingsService};
