//! Customer domain type.

use chrono::{DateTime, Utc};

use tinta_core::{CustomerId, CustomerKind, Email};

/// A storefront customer.
///
/// Registered customers carry a unique email; guests are explicit records
/// with `kind = Guest` and no email, created at checkout for buyers without
/// an account.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub kind: CustomerKind,
    /// Present for registered customers, `None` for guests.
    pub email: Option<Email>,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Gates access to the admin console. Only mutated through the admin
    /// layer or CLI, never implicitly.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
