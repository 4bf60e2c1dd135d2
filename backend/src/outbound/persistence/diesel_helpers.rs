//! Shared error mapping for Diesel repository implementations.

use tracing::{debug, warn};

use crate::domain::ports::DirectoryPersistenceError;

use super::pool::PoolError;

/// Map pool errors to domain directory persistence errors.
pub fn map_pool_error(error: PoolError) -> DirectoryPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DirectoryPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain directory persistence errors.
///
/// `NotFound` is raised by the directory adapter itself when a mutation
/// touches zero rows, so it maps to a missing reference rather than a query
/// failure.
pub fn map_diesel_error(error: diesel::result::Error) -> DirectoryPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DirectoryPersistenceError::missing_reference("record not found"),
        DieselError::QueryBuilderError(_) => {
            DirectoryPersistenceError::query("database query error")
        }
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => DirectoryPersistenceError::conflict(
                info.constraint_name().unwrap_or("unique constraint").to_owned(),
            ),
            DatabaseErrorKind::ForeignKeyViolation => {
                DirectoryPersistenceError::missing_reference(
                    info.constraint_name()
                        .unwrap_or("foreign key constraint")
                        .to_owned(),
                )
            }
            DatabaseErrorKind::ClosedConnection => {
                DirectoryPersistenceError::connection("database connection error")
            }
            DatabaseErrorKind::SerializationFailure => {
                warn!("directory transaction hit a serialization failure");
                DirectoryPersistenceError::conflict("concurrent directory update")
            }
            _ => DirectoryPersistenceError::query("database error"),
        },
        _ => DirectoryPersistenceError::query("database error"),
    }
}
