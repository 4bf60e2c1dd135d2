//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed directory store using Diesel ORM
//! - **memory**: process-local directory store used when no database is
//!   configured
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no reconciliation
//! logic.

pub mod memory;
pub mod persistence;
