//! Driven port for the durable user/group record store.
//!
//! Adapters own both relation indexes (user → groups and group → users) and
//! must apply a [`ChangePlan`] all-or-nothing: either every change lands, or
//! the store is left exactly as it was.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{ChangePlan, Group, GroupName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by directory repository adapters.
    pub enum DirectoryPersistenceError {
        /// Repository connection could not be established.
        Connection => "directory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "directory repository query failed: {message}",
        /// A change tried to insert a key that already exists.
        Conflict => "directory record already exists: {message}",
        /// A change referenced a user or group that does not exist.
        MissingReference => "directory record is missing: {message}",
    }
}

/// Durable store for users, groups and the membership relation between them.
///
/// Reads return projections with both sides of the relation filled in.
/// Writes arrive only as whole [`ChangePlan`]s built by the directory service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Fetch a user together with its group names.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryPersistenceError>;

    /// Fetch a group together with its member ids.
    async fn find_group(&self, name: &GroupName)
    -> Result<Option<Group>, DirectoryPersistenceError>;

    /// Return the subset of `names` that already exist.
    async fn existing_groups(
        &self,
        names: &BTreeSet<GroupName>,
    ) -> Result<BTreeSet<GroupName>, DirectoryPersistenceError>;

    /// Return the subset of `ids` that already exist.
    async fn existing_users(
        &self,
        ids: &BTreeSet<UserId>,
    ) -> Result<BTreeSet<UserId>, DirectoryPersistenceError>;

    /// Apply every change in order inside one transaction.
    async fn apply(&self, plan: ChangePlan) -> Result<(), DirectoryPersistenceError>;
}
