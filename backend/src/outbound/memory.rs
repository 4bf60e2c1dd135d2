//! Process-local directory store.
//!
//! Used when no database URL is configured and by tests. The store keeps the
//! user → groups and group → users indexes side by side. Plans are applied to
//! a staged copy that replaces the live indexes only when every change
//! succeeds, so a failing plan leaves nothing behind.
//!
//! Staging clones all three indexes, so every write costs time and memory
//! proportional to the whole directory. That suits the fallback and test
//! roles; deployments holding large directories should configure
//! PostgreSQL.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{DirectoryPersistenceError, DirectoryRepository};
use crate::domain::{ChangePlan, DirectoryChange, Group, GroupName, User, UserId};

#[derive(Debug, Clone)]
struct Names {
    first: String,
    last: String,
}

#[derive(Debug, Clone, Default)]
struct Indexes {
    names: BTreeMap<UserId, Names>,
    user_groups: BTreeMap<UserId, BTreeSet<GroupName>>,
    group_users: BTreeMap<GroupName, BTreeSet<UserId>>,
}

impl Indexes {
    fn user(&self, id: &UserId) -> Option<User> {
        let names = self.names.get(id)?;
        let groups = self.user_groups.get(id).cloned().unwrap_or_default();
        Some(User::new(id.clone(), names.first.clone(), names.last.clone()).with_groups(groups))
    }

    fn group(&self, name: &GroupName) -> Option<Group> {
        let members = self.group_users.get(name)?;
        Some(Group::new(name.clone()).with_members(members.iter().cloned()))
    }

    fn apply(&mut self, change: &DirectoryChange) -> Result<(), DirectoryPersistenceError> {
        match change {
            DirectoryChange::InsertUser {
                id,
                first_name,
                last_name,
            } => {
                if self.names.contains_key(id) {
                    return Err(DirectoryPersistenceError::conflict(format!("user {id}")));
                }
                self.names.insert(
                    id.clone(),
                    Names {
                        first: first_name.clone(),
                        last: last_name.clone(),
                    },
                );
                self.user_groups.insert(id.clone(), BTreeSet::new());
            }
            DirectoryChange::UpdateUserNames {
                id,
                first_name,
                last_name,
            } => {
                let names = self
                    .names
                    .get_mut(id)
                    .ok_or_else(|| DirectoryPersistenceError::missing_reference(format!("user {id}")))?;
                names.first.clone_from(first_name);
                names.last.clone_from(last_name);
            }
            DirectoryChange::DeleteUser(id) => {
                if self.names.remove(id).is_none() {
                    return Err(DirectoryPersistenceError::missing_reference(format!(
                        "user {id}"
                    )));
                }
                for group in self.user_groups.remove(id).unwrap_or_default() {
                    if let Some(members) = self.group_users.get_mut(&group) {
                        members.remove(id);
                    }
                }
            }
            DirectoryChange::InsertGroup(name) => {
                if self.group_users.contains_key(name) {
                    return Err(DirectoryPersistenceError::conflict(format!("group {name}")));
                }
                self.group_users.insert(name.clone(), BTreeSet::new());
            }
            DirectoryChange::DeleteGroup(name) => {
                let members = self.group_users.remove(name).ok_or_else(|| {
                    DirectoryPersistenceError::missing_reference(format!("group {name}"))
                })?;
                for member in members {
                    if let Some(groups) = self.user_groups.get_mut(&member) {
                        groups.remove(name);
                    }
                }
            }
            DirectoryChange::Link { user, group } => {
                let groups = self.user_groups.get_mut(user).ok_or_else(|| {
                    DirectoryPersistenceError::missing_reference(format!("user {user}"))
                })?;
                let members = self.group_users.get_mut(group).ok_or_else(|| {
                    DirectoryPersistenceError::missing_reference(format!("group {group}"))
                })?;
                if !groups.insert(group.clone()) {
                    return Err(DirectoryPersistenceError::conflict(format!(
                        "membership {user}/{group}"
                    )));
                }
                members.insert(user.clone());
            }
            DirectoryChange::Unlink { user, group } => {
                let removed_from_user = self
                    .user_groups
                    .get_mut(user)
                    .is_some_and(|groups| groups.remove(group));
                let removed_from_group = self
                    .group_users
                    .get_mut(group)
                    .is_some_and(|members| members.remove(user));
                if !(removed_from_user && removed_from_group) {
                    return Err(DirectoryPersistenceError::missing_reference(format!(
                        "membership {user}/{group}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn is_symmetric(&self) -> bool {
        let users_agree = self.user_groups.iter().all(|(user, groups)| {
            self.names.contains_key(user)
                && groups.iter().all(|group| {
                    self.group_users
                        .get(group)
                        .is_some_and(|members| members.contains(user))
                })
        });
        let groups_agree = self.group_users.iter().all(|(group, members)| {
            members.iter().all(|user| {
                self.user_groups
                    .get(user)
                    .is_some_and(|groups| groups.contains(group))
            })
        });
        users_agree && groups_agree && self.names.len() == self.user_groups.len()
    }
}

/// In-memory implementation of the `DirectoryRepository` port.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    indexes: RwLock<Indexes>,
}

impl InMemoryDirectoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every membership is recorded in both indexes and every
    /// indexed user has names on file.
    pub async fn is_consistent(&self) -> bool {
        self.indexes.read().await.is_symmetric()
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryPersistenceError> {
        Ok(self.indexes.read().await.user(id))
    }

    async fn find_group(
        &self,
        name: &GroupName,
    ) -> Result<Option<Group>, DirectoryPersistenceError> {
        Ok(self.indexes.read().await.group(name))
    }

    async fn existing_groups(
        &self,
        names: &BTreeSet<GroupName>,
    ) -> Result<BTreeSet<GroupName>, DirectoryPersistenceError> {
        let indexes = self.indexes.read().await;
        Ok(names
            .iter()
            .filter(|name| indexes.group_users.contains_key(*name))
            .cloned()
            .collect())
    }

    async fn existing_users(
        &self,
        ids: &BTreeSet<UserId>,
    ) -> Result<BTreeSet<UserId>, DirectoryPersistenceError> {
        let indexes = self.indexes.read().await;
        Ok(ids
            .iter()
            .filter(|id| indexes.names.contains_key(*id))
            .cloned()
            .collect())
    }

    async fn apply(&self, plan: ChangePlan) -> Result<(), DirectoryPersistenceError> {
        let mut live = self.indexes.write().await;
        let mut staged = live.clone();
        for change in &plan {
            staged.apply(change)?;
        }
        *live = staged;
        debug!(changes = plan.len(), "directory plan committed in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Store-level coverage for staging, cascading, and index symmetry.
    use super::*;
    use rstest::{fixture, rstest};

    fn insert_user(id: &str) -> DirectoryChange {
        DirectoryChange::InsertUser {
            id: UserId::new(id),
            first_name: "Joe".to_owned(),
            last_name: "Smith".to_owned(),
        }
    }

    fn link(user: &str, group: &str) -> DirectoryChange {
        DirectoryChange::Link {
            user: UserId::new(user),
            group: GroupName::new(group),
        }
    }

    #[fixture]
    fn repo() -> InMemoryDirectoryRepository {
        InMemoryDirectoryRepository::new()
    }

    async fn seed(repo: &InMemoryDirectoryRepository) {
        let mut plan = ChangePlan::single(insert_user("jsmith"));
        plan.push(DirectoryChange::InsertGroup(GroupName::new("admins")));
        plan.push(link("jsmith", "admins"));
        repo.apply(plan).await.expect("seed plan applies");
    }

    #[rstest]
    #[tokio::test]
    async fn link_is_visible_from_both_sides(repo: InMemoryDirectoryRepository) {
        seed(&repo).await;

        let user = repo
            .find_user(&UserId::new("jsmith"))
            .await
            .expect("lookup")
            .expect("user exists");
        let group = repo
            .find_group(&GroupName::new("admins"))
            .await
            .expect("lookup")
            .expect("group exists");

        assert!(user.groups().contains(&GroupName::new("admins")));
        assert!(group.members().contains(&UserId::new("jsmith")));
        assert!(repo.is_consistent().await);
    }

    #[rstest]
    #[tokio::test]
    async fn failing_plan_leaves_store_untouched(repo: InMemoryDirectoryRepository) {
        seed(&repo).await;

        let mut plan = ChangePlan::single(insert_user("jdoe"));
        plan.push(link("jdoe", "admins"));
        plan.push(link("jdoe", "ghosts"));
        let error = repo.apply(plan).await.expect_err("unknown group");

        assert!(matches!(
            error,
            DirectoryPersistenceError::MissingReference { .. }
        ));
        assert!(
            repo.find_user(&UserId::new("jdoe"))
                .await
                .expect("lookup")
                .is_none()
        );
        let admins = repo
            .find_group(&GroupName::new("admins"))
            .await
            .expect("lookup")
            .expect("group exists");
        assert_eq!(admins.members().len(), 1);
        assert!(repo.is_consistent().await);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_inserts_conflict(repo: InMemoryDirectoryRepository) {
        seed(&repo).await;

        let error = repo
            .apply(ChangePlan::single(insert_user("jsmith")))
            .await
            .expect_err("duplicate user");
        assert!(matches!(error, DirectoryPersistenceError::Conflict { .. }));

        let error = repo
            .apply(ChangePlan::single(link("jsmith", "admins")))
            .await
            .expect_err("duplicate membership");
        assert!(matches!(error, DirectoryPersistenceError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_group_cascades_to_members(repo: InMemoryDirectoryRepository) {
        seed(&repo).await;

        repo.apply(ChangePlan::single(DirectoryChange::DeleteGroup(
            GroupName::new("admins"),
        )))
        .await
        .expect("group removed");

        let user = repo
            .find_user(&UserId::new("jsmith"))
            .await
            .expect("lookup")
            .expect("user exists");
        assert!(user.groups().is_empty());
        assert!(repo.is_consistent().await);
    }

    #[rstest]
    #[tokio::test]
    async fn existence_filters_return_known_subset(repo: InMemoryDirectoryRepository) {
        seed(&repo).await;

        let users: BTreeSet<UserId> = ["jsmith", "ghost"].into_iter().map(UserId::from).collect();
        let groups: BTreeSet<GroupName> =
            ["admins", "ghosts"].into_iter().map(GroupName::from).collect();

        let known_users = repo.existing_users(&users).await.expect("lookup");
        let known_groups = repo.existing_groups(&groups).await.expect("lookup");

        assert_eq!(known_users.len(), 1);
        assert!(known_users.contains(&UserId::new("jsmith")));
        assert_eq!(known_groups.len(), 1);
        assert!(known_groups.contains(&GroupName::new("admins")));
    }
}
