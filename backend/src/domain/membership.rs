//! Membership reconciliation between users and groups.
//!
//! [`reconcile`] is a pure set difference: given the current and desired
//! member sets of one side of the relation it yields the keys to unlink and
//! the keys to link. [`MembershipDiff`] then expands into a [`ChangePlan`]
//! that repositories apply as one unit. Plans always list every `Unlink`
//! before any group creation or `Link`, and every `Link`/`Unlink` touches
//! both relation indexes.

use std::collections::BTreeSet;

use super::{GroupName, UserId, UserRecord};

/// Keys to link and unlink so `current` becomes `desired`.
///
/// `to_add` and `to_remove` are always disjoint. Iteration order is sorted
/// but carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDiff<K> {
    to_add: BTreeSet<K>,
    to_remove: BTreeSet<K>,
}

/// Compute `to_remove = current − desired` and `to_add = desired − current`.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use directory::domain::reconcile;
///
/// let current: BTreeSet<_> = ["jsmith", "jdoe"].into_iter().collect();
/// let desired: BTreeSet<_> = ["jsmith"].into_iter().collect();
/// let diff = reconcile(&current, &desired);
///
/// assert!(diff.to_add().is_empty());
/// assert!(diff.to_remove().contains("jdoe"));
/// ```
pub fn reconcile<K>(current: &BTreeSet<K>, desired: &BTreeSet<K>) -> MembershipDiff<K>
where
    K: Ord + Clone,
{
    MembershipDiff {
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(desired).cloned().collect(),
    }
}

impl<K> MembershipDiff<K> {
    /// Keys present in the desired set only.
    pub fn to_add(&self) -> &BTreeSet<K> {
        &self.to_add
    }

    /// Keys present in the current set only.
    pub fn to_remove(&self) -> &BTreeSet<K> {
        &self.to_remove
    }

    /// True when the current set already matches the desired one.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

impl MembershipDiff<GroupName> {
    /// Expand a diff over one user's groups into an ordered plan.
    ///
    /// Groups in `to_add` that are not listed in `existing_groups` are
    /// created before they are linked.
    pub fn user_side_plan(&self, user: &UserId, existing_groups: &BTreeSet<GroupName>) -> ChangePlan {
        let mut plan = ChangePlan::default();
        for group in &self.to_remove {
            plan.push(DirectoryChange::Unlink {
                user: user.clone(),
                group: group.clone(),
            });
        }
        for group in &self.to_add {
            if !existing_groups.contains(group) {
                plan.push(DirectoryChange::InsertGroup(group.clone()));
            }
            plan.push(DirectoryChange::Link {
                user: user.clone(),
                group: group.clone(),
            });
        }
        plan
    }
}

impl MembershipDiff<UserId> {
    /// Expand a diff over one group's members into an ordered plan.
    ///
    /// Callers must have filtered `desired` down to existing users; users are
    /// never created from the group side.
    pub fn group_side_plan(&self, group: &GroupName) -> ChangePlan {
        let mut plan = ChangePlan::default();
        for user in &self.to_remove {
            plan.push(DirectoryChange::Unlink {
                user: user.clone(),
                group: group.clone(),
            });
        }
        for user in &self.to_add {
            plan.push(DirectoryChange::Link {
                user: user.clone(),
                group: group.clone(),
            });
        }
        plan
    }
}

/// A single mutation of the directory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryChange {
    /// Insert a user row with no memberships.
    InsertUser {
        id: UserId,
        first_name: String,
        last_name: String,
    },
    /// Overwrite the name fields of an existing user.
    UpdateUserNames {
        id: UserId,
        first_name: String,
        last_name: String,
    },
    /// Remove a user that no longer has memberships.
    DeleteUser(UserId),
    /// Insert an empty group.
    InsertGroup(GroupName),
    /// Remove a group that no longer has members.
    DeleteGroup(GroupName),
    /// Record membership on both sides of the relation.
    Link { user: UserId, group: GroupName },
    /// Drop membership from both sides of the relation.
    Unlink { user: UserId, group: GroupName },
}

/// Ordered list of changes applied atomically by a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePlan {
    changes: Vec<DirectoryChange>,
}

impl ChangePlan {
    /// Start a plan with a single change.
    pub fn single(change: DirectoryChange) -> Self {
        Self {
            changes: vec![change],
        }
    }

    /// Append one change to the end of the plan.
    pub fn push(&mut self, change: DirectoryChange) {
        self.changes.push(change);
    }

    /// Append every change of `other`, preserving order.
    pub fn append(&mut self, other: ChangePlan) {
        self.changes.extend(other.changes);
    }

    /// Changes in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryChange> {
        self.changes.iter()
    }

    /// Number of changes in the plan.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True when applying the plan would change nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Count `Link` changes.
    pub fn links(&self) -> usize {
        self.iter()
            .filter(|change| matches!(change, DirectoryChange::Link { .. }))
            .count()
    }

    /// Count `Unlink` changes.
    pub fn unlinks(&self) -> usize {
        self.iter()
            .filter(|change| matches!(change, DirectoryChange::Unlink { .. }))
            .count()
    }
}

impl IntoIterator for ChangePlan {
    type Item = DirectoryChange;
    type IntoIter = std::vec::IntoIter<DirectoryChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangePlan {
    type Item = &'a DirectoryChange;
    type IntoIter = std::slice::Iter<'a, DirectoryChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Plan inserting a new user and linking it to the record's groups.
pub fn create_user_plan(record: &UserRecord, existing_groups: &BTreeSet<GroupName>) -> ChangePlan {
    let mut plan = ChangePlan::single(DirectoryChange::InsertUser {
        id: record.userid().clone(),
        first_name: record.first_name().to_owned(),
        last_name: record.last_name().to_owned(),
    });
    let diff = reconcile(&BTreeSet::new(), record.groups());
    plan.append(diff.user_side_plan(record.userid(), existing_groups));
    plan
}

/// Plan unlinking a user from all of its groups and then deleting it.
pub fn delete_user_plan(user: &UserId, groups: &BTreeSet<GroupName>) -> ChangePlan {
    let mut plan = reconcile(groups, &BTreeSet::new()).user_side_plan(user, groups);
    plan.push(DirectoryChange::DeleteUser(user.clone()));
    plan
}

/// Plan unlinking every member of a group and then deleting it.
pub fn delete_group_plan(group: &GroupName, members: &BTreeSet<UserId>) -> ChangePlan {
    let mut plan = reconcile(members, &BTreeSet::new()).group_side_plan(group);
    plan.push(DirectoryChange::DeleteGroup(group.clone()));
    plan
}
