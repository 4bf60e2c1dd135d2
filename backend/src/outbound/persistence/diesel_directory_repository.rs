//! PostgreSQL-backed `DirectoryRepository` implementation using Diesel ORM.
//!
//! Both relation indexes are derived from the single `user_groups` table, so
//! a committed `Link` or `Unlink` is always visible from the user and the
//! group side at once. Plans run inside one transaction; any failing change
//! rolls the whole plan back.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DirectoryPersistenceError, DirectoryRepository};
use crate::domain::{ChangePlan, DirectoryChange, Group, GroupName, User, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewGroupRow, NewMembershipRow, NewUserRow, UserNamesUpdate, UserRow};
use super::pool::DbPool;
use super::schema::{groups, user_groups, users};

/// Diesel-backed implementation of the `DirectoryRepository` port.
#[derive(Clone)]
pub struct DieselDirectoryRepository {
    pool: DbPool,
}

impl DieselDirectoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Treat a mutation that touched no rows as a dangling reference.
fn require_rows(affected: usize) -> QueryResult<()> {
    if affected == 0 {
        Err(diesel::result::Error::NotFound)
    } else {
        Ok(())
    }
}

async fn apply_change(conn: &mut AsyncPgConnection, change: &DirectoryChange) -> QueryResult<()> {
    match change {
        DirectoryChange::InsertUser {
            id,
            first_name,
            last_name,
        } => {
            diesel::insert_into(users::table)
                .values(&NewUserRow {
                    userid: id.as_ref(),
                    first_name,
                    last_name,
                })
                .execute(conn)
                .await?;
        }
        DirectoryChange::UpdateUserNames {
            id,
            first_name,
            last_name,
        } => {
            let affected = diesel::update(users::table.filter(users::userid.eq(id.as_ref())))
                .set(&UserNamesUpdate {
                    first_name,
                    last_name,
                })
                .execute(conn)
                .await?;
            require_rows(affected)?;
        }
        DirectoryChange::DeleteUser(id) => {
            let affected = diesel::delete(users::table.filter(users::userid.eq(id.as_ref())))
                .execute(conn)
                .await?;
            require_rows(affected)?;
        }
        DirectoryChange::InsertGroup(name) => {
            diesel::insert_into(groups::table)
                .values(&NewGroupRow {
                    name: name.as_ref(),
                })
                .execute(conn)
                .await?;
        }
        DirectoryChange::DeleteGroup(name) => {
            let affected = diesel::delete(groups::table.filter(groups::name.eq(name.as_ref())))
                .execute(conn)
                .await?;
            require_rows(affected)?;
        }
        DirectoryChange::Link { user, group } => {
            diesel::insert_into(user_groups::table)
                .values(&NewMembershipRow {
                    userid: user.as_ref(),
                    group_name: group.as_ref(),
                })
                .execute(conn)
                .await?;
        }
        DirectoryChange::Unlink { user, group } => {
            let affected = diesel::delete(
                user_groups::table
                    .filter(user_groups::userid.eq(user.as_ref()))
                    .filter(user_groups::group_name.eq(group.as_ref())),
            )
            .execute(conn)
            .await?;
            require_rows(affected)?;
        }
    }
    Ok(())
}

#[async_trait]
impl DirectoryRepository for DieselDirectoryRepository {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let userid = id.as_ref().to_owned();

        // Row and memberships share one snapshot so the projection never
        // mixes two versions of the relation.
        let found = conn
            .transaction(|conn| {
                async move {
                    let row: Option<UserRow> = users::table
                        .filter(users::userid.eq(&userid))
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let group_names: Vec<String> = user_groups::table
                        .filter(user_groups::userid.eq(&userid))
                        .select(user_groups::group_name)
                        .load(conn)
                        .await?;
                    Ok(Some((row, group_names)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(found.map(|(row, group_names)| {
            User::new(UserId::new(row.userid), row.first_name, row.last_name)
                .with_groups(group_names.into_iter().map(GroupName::new))
        }))
    }

    async fn find_group(
        &self,
        name: &GroupName,
    ) -> Result<Option<Group>, DirectoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let group_name = name.as_ref().to_owned();

        let found = conn
            .transaction(|conn| {
                async move {
                    let stored: Option<String> = groups::table
                        .filter(groups::name.eq(&group_name))
                        .select(groups::name)
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(stored) = stored else {
                        return Ok(None);
                    };
                    let members: Vec<String> = user_groups::table
                        .filter(user_groups::group_name.eq(&group_name))
                        .select(user_groups::userid)
                        .load(conn)
                        .await?;
                    Ok(Some((stored, members)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(found.map(|(stored, members)| {
            Group::new(GroupName::new(stored)).with_members(members.into_iter().map(UserId::new))
        }))
    }

    async fn existing_groups(
        &self,
        names: &BTreeSet<GroupName>,
    ) -> Result<BTreeSet<GroupName>, DirectoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let wanted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();

        let found: Vec<String> = groups::table
            .filter(groups::name.eq_any(wanted))
            .select(groups::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(found.into_iter().map(GroupName::new).collect())
    }

    async fn existing_users(
        &self,
        ids: &BTreeSet<UserId>,
    ) -> Result<BTreeSet<UserId>, DirectoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let wanted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();

        let found: Vec<String> = users::table
            .filter(users::userid.eq_any(wanted))
            .select(users::userid)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(found.into_iter().map(UserId::new).collect())
    }

    async fn apply(&self, plan: ChangePlan) -> Result<(), DirectoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = plan.len();

        conn.transaction(|conn| {
            async move {
                for change in &plan {
                    apply_change(conn, change).await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        debug!(changes, "directory plan committed");
        Ok(())
    }
}
