//! Shared helpers for the directory integration tests.
//!
//! Each file under `tests/` compiles as its own crate, so helpers used by
//! more than one suite live here and are pulled in with `mod support;`.

mod cluster_skip;
mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;
pub use pg_embed::{create_database, test_cluster};

/// Render a `postgres` error with its SQLSTATE and server message.
///
/// `postgres::Error`'s `Display` collapses server errors to `db error`, which
/// hides the reason a setup statement failed.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
