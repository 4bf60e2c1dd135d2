//! Directory domain service.
//!
//! Implements the driving ports for users and groups on top of a
//! [`DirectoryRepository`]. Every operation runs inside a service-wide gate:
//! mutations hold the exclusive guard across lookup, reconciliation, and
//! apply, so no caller observes a half-reconciled relation. Reads share the
//! guard with each other.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    DirectoryCommand, DirectoryPersistenceError, DirectoryQuery, DirectoryRepository,
};
use crate::domain::{
    ChangePlan, DirectoryChange, Error, Group, GroupName, User, UserId, UserRecord,
    create_user_plan, delete_group_plan, delete_user_plan, reconcile,
};

/// Directory service implementing the command and query ports.
pub struct DirectoryService<R> {
    repository: Arc<R>,
    gate: Arc<RwLock<()>>,
}

impl<R> Clone for DirectoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<R> DirectoryService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            gate: Arc::new(RwLock::new(())),
        }
    }
}

impl<R> DirectoryService<R>
where
    R: DirectoryRepository,
{
    fn map_persistence_error(error: DirectoryPersistenceError) -> Error {
        match error {
            DirectoryPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("directory store unavailable: {message}"))
            }
            DirectoryPersistenceError::Query { message } => {
                Error::internal(format!("directory store error: {message}"))
            }
            DirectoryPersistenceError::Conflict { message } => Error::conflict(message),
            DirectoryPersistenceError::MissingReference { message } => Error::not_found(message),
        }
    }

    fn user_missing(id: &UserId) -> Error {
        Error::not_found(format!("user {id} does not exist"))
    }

    fn group_missing(name: &GroupName) -> Error {
        Error::not_found(format!("group {name} does not exist"))
    }

    async fn lookup_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.repository
            .find_user(id)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn lookup_group(&self, name: &GroupName) -> Result<Option<Group>, Error> {
        self.repository
            .find_group(name)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn require_user(&self, id: &UserId) -> Result<User, Error> {
        self.lookup_user(id)
            .await?
            .ok_or_else(|| Self::user_missing(id))
    }

    async fn require_group(&self, name: &GroupName) -> Result<Group, Error> {
        self.lookup_group(name)
            .await?
            .ok_or_else(|| Self::group_missing(name))
    }

    async fn known_groups(&self, names: &BTreeSet<GroupName>) -> Result<BTreeSet<GroupName>, Error> {
        if names.is_empty() {
            return Ok(BTreeSet::new());
        }
        self.repository
            .existing_groups(names)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn apply(&self, plan: ChangePlan) -> Result<(), Error> {
        if plan.is_empty() {
            return Ok(());
        }
        self.repository
            .apply(plan)
            .await
            .map_err(Self::map_persistence_error)
    }
}

fn created_groups(plan: &ChangePlan) -> usize {
    plan.iter()
        .filter(|change| matches!(change, DirectoryChange::InsertGroup(_)))
        .count()
}

#[async_trait]
impl<R> DirectoryCommand for DirectoryService<R>
where
    R: DirectoryRepository,
{
    async fn create_user(&self, record: UserRecord) -> Result<User, Error> {
        let _guard = self.gate.write().await;
        let id = record.userid();
        if self.lookup_user(id).await?.is_some() {
            return Err(Error::conflict(format!("user {id} already exists")));
        }

        let existing = self.known_groups(record.groups()).await?;
        let plan = create_user_plan(&record, &existing);
        let auto_created = created_groups(&plan);
        self.apply(plan).await?;

        info!(
            userid = %id,
            groups = record.groups().len(),
            auto_created,
            "user created"
        );
        Ok(
            User::new(id.clone(), record.first_name(), record.last_name())
                .with_groups(record.groups().iter().cloned()),
        )
    }

    async fn create_group(&self, name: GroupName) -> Result<Group, Error> {
        let _guard = self.gate.write().await;
        if self.lookup_group(&name).await?.is_some() {
            return Err(Error::conflict(format!("group {name} already exists")));
        }

        self.apply(ChangePlan::single(DirectoryChange::InsertGroup(
            name.clone(),
        )))
        .await?;
        info!(group = %name, "group created");
        Ok(Group::new(name))
    }

    async fn update_user(&self, id: &UserId, record: UserRecord) -> Result<User, Error> {
        let _guard = self.gate.write().await;
        let existing = self.require_user(id).await?;
        if record.userid() != id {
            debug!(
                userid = %id,
                submitted = %record.userid(),
                "ignoring userid in update body; keys are immutable"
            );
        }

        let diff = reconcile(existing.groups(), record.groups());
        let known = self.known_groups(diff.to_add()).await?;
        let mut plan = ChangePlan::single(DirectoryChange::UpdateUserNames {
            id: id.clone(),
            first_name: record.first_name().to_owned(),
            last_name: record.last_name().to_owned(),
        });
        plan.append(diff.user_side_plan(id, &known));
        let (added, removed) = (plan.links(), plan.unlinks());
        let auto_created = created_groups(&plan);
        self.apply(plan).await?;

        info!(userid = %id, added, removed, auto_created, "user updated");
        Ok(
            User::new(id.clone(), record.first_name(), record.last_name())
                .with_groups(record.groups().iter().cloned()),
        )
    }

    async fn update_group_membership(
        &self,
        name: &GroupName,
        members: Vec<UserId>,
    ) -> Result<Group, Error> {
        let _guard = self.gate.write().await;
        let group = self.require_group(name).await?;

        let requested: BTreeSet<UserId> = members.into_iter().collect();
        let desired = if requested.is_empty() {
            BTreeSet::new()
        } else {
            self.repository
                .existing_users(&requested)
                .await
                .map_err(Self::map_persistence_error)?
        };
        let dropped = requested.len().saturating_sub(desired.len());
        if dropped > 0 {
            warn!(group = %name, dropped, "ignoring unknown user ids in membership update");
        }

        let diff = reconcile(group.members(), &desired);
        let plan = diff.group_side_plan(name);
        let (added, removed) = (plan.links(), plan.unlinks());
        self.apply(plan).await?;

        info!(group = %name, added, removed, "group membership updated");
        Ok(Group::new(name.clone()).with_members(desired))
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let _guard = self.gate.write().await;
        let user = self.require_user(id).await?;
        let plan = delete_user_plan(id, user.groups());
        self.apply(plan).await?;
        info!(userid = %id, groups = user.groups().len(), "user deleted");
        Ok(())
    }

    async fn delete_group(&self, name: &GroupName) -> Result<(), Error> {
        let _guard = self.gate.write().await;
        let group = self.require_group(name).await?;
        let plan = delete_group_plan(name, group.members());
        self.apply(plan).await?;
        info!(group = %name, members = group.members().len(), "group deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> DirectoryQuery for DirectoryService<R>
where
    R: DirectoryRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        let _guard = self.gate.read().await;
        self.require_user(id).await
    }

    async fn get_group(&self, name: &GroupName) -> Result<Group, Error> {
        let _guard = self.gate.read().await;
        self.require_group(name).await
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
