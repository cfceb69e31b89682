//! Errors for repository operations that enforce domain rules.
//!
//! Plain CRUD repositories return `sqlx::Error`; the ledger and catalog
//! loaders can also fail on domain validation.

use idolsim_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
