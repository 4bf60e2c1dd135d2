//! Embedded schema migrations for the directory tables.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::DirectoryPersistenceError;

/// Migrations from the `backend/migrations` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations using a short-lived synchronous connection.
///
/// Runs on the blocking thread pool so startup never stalls the async
/// runtime.
///
/// # Errors
///
/// Returns [`DirectoryPersistenceError::Connection`] when the database is
/// unreachable and [`DirectoryPersistenceError::Query`] when a migration
/// fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), DirectoryPersistenceError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| DirectoryPersistenceError::connection(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| DirectoryPersistenceError::query(format!("migration: {err}")))
    })
    .await
    .map_err(|err| DirectoryPersistenceError::query(format!("migration task: {err}")))??;

    info!(applied, "directory migrations complete");
    Ok(())
}
