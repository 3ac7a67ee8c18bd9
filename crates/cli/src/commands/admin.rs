//! Customer admin flag management.
//!
//! # Usage
//!
//! ```bash
//! tinta admin grant -i <customer-uuid>
//! tinta admin revoke -i <customer-uuid>
//! ```

use tinta_admin::AdminCustomers;
use tinta_admin::validate::parse_input;
use tinta_core::CustomerId;

/// Grant or revoke the admin flag on a customer.
///
/// # Errors
///
/// Returns an error if the ID is not a valid UUID, the customer does not
/// exist, or the database is unreachable.
pub async fn set_admin(raw_id: &str, is_admin: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id: CustomerId = parse_input(raw_id)?;

    let pool = super::connect().await?;
    AdminCustomers::new(&pool).set_admin(id, is_admin).await?;

    if is_admin {
        tracing::info!("Granted admin access to customer {id}");
    } else {
        tracing::info!("Revoked admin access from customer {id}");
    }

    Ok(())
}
