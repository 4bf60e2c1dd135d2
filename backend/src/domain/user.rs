//! User data model and the validated user record accepted by the directory.

use std::collections::BTreeSet;
use std::fmt;

use super::GroupName;

/// Validation errors returned by [`UserRecord::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRecordValidationError {
    /// One or more of the four required keys was absent (or `null`).
    MissingFields { fields: Vec<&'static str> },
}

impl UserRecordValidationError {
    /// Names of the absent fields, in declaration order.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields { fields } => fields.as_slice(),
        }
    }
}

impl fmt::Display for UserRecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { fields } => write!(
                f,
                "user record is missing required fields: {}",
                fields.join(", ")
            ),
        }
    }
}

impl std::error::Error for UserRecordValidationError {}

/// Stable, immutable user identifier (the `userid` key).
///
/// Content is not constrained beyond presence; the directory treats the
/// identifier as an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Directory user.
///
/// ## Invariants
/// - `groups` mirrors the member sets of the referenced groups; only the
///   directory service changes either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    groups: BTreeSet<GroupName>,
}

impl User {
    /// Build a user without any group memberships.
    pub fn new(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            groups: BTreeSet::new(),
        }
    }

    /// Replace the group memberships carried by this projection.
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupName>) -> Self {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Given name as last stored.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name as last stored.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Names of the groups this user belongs to.
    pub fn groups(&self) -> &BTreeSet<GroupName> {
        &self.groups
    }
}

/// A complete user record as submitted for creation or replacement.
///
/// Duplicate group names collapse into a set.
///
/// # Examples
/// ```
/// use directory::domain::UserRecord;
///
/// let record = UserRecord::try_from_parts(
///     Some("jsmith".into()),
///     Some("Joe".into()),
///     Some("Smith".into()),
///     Some(vec!["admins".into(), "admins".into()]),
/// )
/// .unwrap();
/// assert_eq!(record.groups().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    userid: UserId,
    first_name: String,
    last_name: String,
    groups: BTreeSet<GroupName>,
}

impl UserRecord {
    /// Construct a record from optional inputs, requiring every key to be
    /// present. Empty strings and empty group lists are accepted.
    pub fn try_from_parts(
        userid: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        groups: Option<Vec<String>>,
    ) -> Result<Self, UserRecordValidationError> {
        let mut missing = Vec::new();
        if first_name.is_none() {
            missing.push("first_name");
        }
        if last_name.is_none() {
            missing.push("last_name");
        }
        if userid.is_none() {
            missing.push("userid");
        }
        if groups.is_none() {
            missing.push("groups");
        }

        match (userid, first_name, last_name, groups) {
            (Some(userid), Some(first_name), Some(last_name), Some(groups)) => Ok(Self {
                userid: UserId::new(userid),
                first_name,
                last_name,
                groups: groups.into_iter().map(GroupName::new).collect(),
            }),
            _ => Err(UserRecordValidationError::MissingFields { fields: missing }),
        }
    }

    /// Identifier carried in the submitted body.
    pub fn userid(&self) -> &UserId {
        &self.userid
    }

    /// Submitted given name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Submitted family name.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Desired group memberships.
    pub fn groups(&self) -> &BTreeSet<GroupName> {
        &self.groups
    }
}
