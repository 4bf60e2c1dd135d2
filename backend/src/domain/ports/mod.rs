//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod directory_command;
mod directory_query;
mod directory_repository;

#[cfg(test)]
pub use directory_command::MockDirectoryCommand;
pub use directory_command::DirectoryCommand;
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use directory_repository::MockDirectoryRepository;
pub use directory_repository::{DirectoryPersistenceError, DirectoryRepository};
