//! Driving port for directory reads.

use async_trait::async_trait;

use crate::domain::{Error, Group, GroupName, User, UserId};

/// Domain use-case port for looking up users and group members.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Fetch a user and its group names.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Fetch a group and its member ids.
    async fn get_group(&self, name: &GroupName) -> Result<Group, Error>;
}
