//! Group data model.

use std::collections::BTreeSet;
use std::fmt;

use super::UserId;

/// Stable, immutable group key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// Wrap a raw group name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<String> for GroupName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GroupName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<GroupName> for String {
    fn from(value: GroupName) -> Self {
        value.0
    }
}

/// Named group of users. A group may have no members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: GroupName,
    members: BTreeSet<UserId>,
}

impl Group {
    /// Build an empty group.
    pub fn new(name: GroupName) -> Self {
        Self {
            name,
            members: BTreeSet::new(),
        }
    }

    /// Replace the member set carried by this projection.
    pub fn with_members(mut self, members: impl IntoIterator<Item = UserId>) -> Self {
        self.members = members.into_iter().collect();
        self
    }

    /// Unique group name.
    pub fn name(&self) -> &GroupName {
        &self.name
    }

    /// Identifiers of the users in this group.
    pub fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }
}
