//! Admin layer error type.

use thiserror::Error;

use tinta_storefront::db::RepositoryError;

/// Errors surfaced by admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Input failed validation before reaching the database.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The requested status change is not a legal transition.
    #[error("cannot move {entity} from '{from}' to '{to}'")]
    IllegalTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
