//! Driving port for directory mutations.
//!
//! Inbound adapters call this port with already-validated records; the
//! implementation owns existence checks, auto-vivification of groups, and
//! membership reconciliation.

use async_trait::async_trait;

use crate::domain::{Error, Group, GroupName, User, UserId, UserRecord};

/// Domain use-case port for creating, replacing, and deleting directory
/// entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryCommand: Send + Sync {
    /// Create a user, creating any referenced groups that do not exist yet.
    ///
    /// Fails with [`crate::domain::ErrorCode::Conflict`] when the user exists.
    async fn create_user(&self, record: UserRecord) -> Result<User, Error>;

    /// Create an empty group.
    ///
    /// Fails with [`crate::domain::ErrorCode::Conflict`] when the group exists.
    async fn create_group(&self, name: GroupName) -> Result<Group, Error>;

    /// Overwrite a user's names and reconcile its group set with the record.
    async fn update_user(&self, id: &UserId, record: UserRecord) -> Result<User, Error>;

    /// Reconcile a group's member set. Unknown user ids are dropped.
    async fn update_group_membership(
        &self,
        name: &GroupName,
        members: Vec<UserId>,
    ) -> Result<Group, Error>;

    /// Remove a user and every membership it holds.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;

    /// Remove a group and every membership it holds.
    async fn delete_group(&self, name: &GroupName) -> Result<(), Error>;
}
