//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The directory store maps onto three tables: `users`, `groups`, and the
//! `user_groups` relation. Connections come from a `bb8` pool through
//! `diesel-async`; schema setup uses embedded Diesel migrations.
//!
//! - **Thin adapters**: the repository only translates between rows and
//!   domain types and applies change plans. Reconciliation lives in the
//!   domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map to
//!   [`crate::domain::ports::DirectoryPersistenceError`].
//!
//! # Example
//!
//! ```ignore
//! use directory::outbound::persistence::{DbPool, DieselDirectoryRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/directory")).await?;
//! let repo = DieselDirectoryRepository::new(pool);
//! ```

mod diesel_directory_repository;
pub(crate) mod diesel_helpers;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_directory_repository::DieselDirectoryRepository;
pub use migrations::{MIGRATIONS, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
