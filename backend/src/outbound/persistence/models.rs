//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{groups, user_groups, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub userid: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Changeset struct for overwriting a user's names.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserNamesUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Insertable struct for creating new group records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub(crate) struct NewGroupRow<'a> {
    pub name: &'a str,
}

/// Insertable struct for one membership pair.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_groups)]
pub(crate) struct NewMembershipRow<'a> {
    pub userid: &'a str,
    pub group_name: &'a str,
}
