//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed directory entities used by the API and
//! persistence layers, plus the reconciliation rules that keep the
//! user → groups and group → users relations mirror images of each other.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / UserRecord: stored user and its validated write payload.
//! - Group: stored group with its member ids.
//! - reconcile / ChangePlan: membership diffing and the plans applied by
//!   repositories.
//! - DirectoryService: implementation of the directory driving ports.

pub mod directory_service;
pub mod error;
pub mod group;
pub mod membership;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::group::{Group, GroupName};
pub use self::membership::{
    ChangePlan, DirectoryChange, MembershipDiff, create_user_plan, delete_group_plan,
    delete_user_plan, reconcile,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserRecord, UserRecordValidationError};
