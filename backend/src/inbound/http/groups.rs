//! Groups API handlers.
//!
//! ```text
//! POST /groups {"name":"admins"}
//! GET /groups/admins
//! PUT /groups/admins {"members":["jsmith"]}
//! DELETE /groups/admins
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, Group, GroupName, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /groups`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct GroupPayload {
    #[schema(example = "admins")]
    pub name: Option<String>,
}

/// Request body for `PUT /groups/{name}`. Unknown user ids are dropped.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MembershipPayload {
    #[schema(example = json!(["jsmith", "jdoe"]))]
    pub members: Option<Vec<String>>,
}

/// Group with its member ids.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GroupResponse {
    #[schema(example = "admins")]
    pub name: String,
    #[schema(example = json!(["jsmith"]))]
    pub members: Vec<String>,
}

/// Member ids of a group; order carries no meaning.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GroupMembersResponse {
    #[schema(example = json!(["jsmith"]))]
    pub members: Vec<String>,
}

fn member_ids(group: &Group) -> Vec<String> {
    group.members().iter().map(ToString::to_string).collect()
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            members: member_ids(&group),
            name: group.name().to_string(),
        }
    }
}

impl From<Group> for GroupMembersResponse {
    fn from(group: Group) -> Self {
        Self {
            members: member_ids(&group),
        }
    }
}

fn missing_field(field: &'static str) -> Error {
    Error::invalid_request(format!("request body is missing required field: {field}"))
        .with_details(json!({ "missing": [field] }))
}

/// Create an empty group.
#[utoipa::path(
    post,
    path = "/groups",
    request_body = GroupPayload,
    responses(
        (status = 201, description = "New group created", body = GroupResponse),
        (status = 400, description = "Missing name", body = Error),
        (status = 409, description = "Group already exists", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["groups"],
    operation_id = "createGroup"
)]
#[post("/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    payload: web::Json<GroupPayload>,
) -> ApiResult<HttpResponse> {
    let name = payload
        .into_inner()
        .name
        .map(GroupName::new)
        .ok_or_else(|| missing_field("name"))?;
    let group = state.directory.create_group(name).await?;
    Ok(HttpResponse::Created().json(GroupResponse::from(group)))
}

/// List the member ids of a group.
#[utoipa::path(
    get,
    path = "/groups/{name}",
    params(("name" = String, Path, description = "Group name")),
    responses(
        (status = 200, description = "Group members", body = GroupMembersResponse),
        (status = 404, description = "Group does not exist", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["groups"],
    operation_id = "getGroupMembers"
)]
#[get("/groups/{name}")]
pub async fn get_group_members(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GroupMembersResponse>> {
    let name = GroupName::new(path.into_inner());
    let group = state.directory_query.get_group(&name).await?;
    Ok(web::Json(GroupMembersResponse::from(group)))
}

/// Replace a group's member set.
///
/// An unusable body (malformed JSON or no `members`) is reported as 404, the
/// same as a missing group.
#[utoipa::path(
    put,
    path = "/groups/{name}",
    params(("name" = String, Path, description = "Group name")),
    request_body = MembershipPayload,
    responses(
        (status = 200, description = "Group memberships updated", body = GroupResponse),
        (status = 404, description = "Group does not exist or body is invalid", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["groups"],
    operation_id = "updateGroupMembership"
)]
#[put("/groups/{name}")]
pub async fn update_group_membership(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Result<web::Json<MembershipPayload>, actix_web::Error>,
) -> ApiResult<web::Json<GroupResponse>> {
    let name = GroupName::new(path.into_inner());
    let payload = payload.map_err(|err| {
        debug!(group = %name, error = %err, "unreadable membership body");
        Error::not_found(format!(
            "group {name} cannot be updated: body is not a member list"
        ))
    })?;
    let members = payload.into_inner().members.ok_or_else(|| {
        Error::not_found(format!(
            "group {name} cannot be updated: request body is missing required field: members"
        ))
        .with_details(json!({ "missing": ["members"] }))
    })?;
    let group = state
        .directory
        .update_group_membership(&name, members.into_iter().map(UserId::new).collect())
        .await?;
    Ok(web::Json(GroupResponse::from(group)))
}

/// Delete a group and drop it from every member.
#[utoipa::path(
    delete,
    path = "/groups/{name}",
    params(("name" = String, Path, description = "Group name")),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 404, description = "Group does not exist", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["groups"],
    operation_id = "deleteGroup"
)]
#[delete("/groups/{name}")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let name = GroupName::new(path.into_inner());
    state.directory.delete_group(&name).await?;
    Ok(web::Json(MessageResponse::new("Group deleted")))
}
