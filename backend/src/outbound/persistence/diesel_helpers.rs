//! Error mapping shared by the Diesel-backed store adapters.

use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors to domain store errors. Both variants mean the store is
/// unreachable, so both classify as connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain store errors by cause.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    StoreError::connection("database connection closed")
                }
                // The DB-level uniqueness backstop fired: a concurrent
                // transaction won the race. The caller can safely retry and
                // will hit the replay path.
                DatabaseErrorKind::UniqueViolation => {
                    StoreError::conflict("conflicting concurrent redemption")
                }
                _ if info.message().contains("statement timeout") => {
                    StoreError::timeout("statement timed out")
                }
                _ => StoreError::query("database error"),
            }
        }
        DieselError::NotFound => StoreError::query("record not found"),
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(&other),
                "diesel operation failed"
            );
            StoreError::query("database error")
        }
    }
}
