//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Directory users keyed by their caller-chosen identifier.
    users (userid) {
        /// Primary key: opaque user identifier.
        userid -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
    }
}

diesel::table! {
    /// Directory groups. Membership lives in `user_groups`.
    groups (name) {
        /// Primary key: group name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Membership relation. Each row is one user/group pair; both foreign
    /// keys cascade on delete.
    user_groups (userid, group_name) {
        userid -> Varchar,
        group_name -> Varchar,
    }
}

diesel::joinable!(user_groups -> users (userid));
diesel::joinable!(user_groups -> groups (group_name));

diesel::allow_tables_to_appear_in_same_query!(users, groups, user_groups);
