//! Users API handlers.
//!
//! ```text
//! POST /users {"userid":"jsmith","first_name":"Joe","last_name":"Smith","groups":["admins"]}
//! GET /users/jsmith
//! PUT /users/jsmith {"userid":"jsmith","first_name":"Joe","last_name":"Smith","groups":[]}
//! DELETE /users/jsmith
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, User, UserId, UserRecord, UserRecordValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;

/// Request body for creating or replacing a user.
///
/// Every field is required; they are optional here only so a missing key is
/// reported as a validation error listing all absent fields at once. Empty
/// strings and lists are accepted.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    #[schema(example = "jsmith")]
    pub userid: Option<String>,
    #[schema(example = "Joe")]
    pub first_name: Option<String>,
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
    #[schema(example = json!(["admins", "users"]))]
    pub groups: Option<Vec<String>>,
}

impl TryFrom<UserPayload> for UserRecord {
    type Error = UserRecordValidationError;

    fn try_from(value: UserPayload) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.userid, value.first_name, value.last_name, value.groups)
    }
}

/// User projection returned by the users endpoints. `groups` order carries
/// no meaning.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "jsmith")]
    pub userid: String,
    #[schema(example = "Joe")]
    pub first_name: String,
    #[schema(example = "Smith")]
    pub last_name: String,
    #[schema(example = json!(["admins", "users"]))]
    pub groups: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            userid: user.id().to_string(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            groups: user.groups().iter().map(ToString::to_string).collect(),
        }
    }
}

fn map_record_validation_error(err: UserRecordValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "missing": err.missing_fields() }))
}

/// Create a user, creating any listed groups that do not exist yet.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or malformed fields", body = Error),
        (status = 409, description = "User already exists", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let record = UserRecord::try_from(payload.into_inner()).map_err(map_record_validation_error)?;
    let user = state.directory.create_user(record).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Fetch a user and its group names.
#[utoipa::path(
    get,
    path = "/users/{userid}",
    params(("userid" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User does not exist", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{userid}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let user = state.directory_query.get_user(&id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Replace a user's names and reconcile its group memberships.
///
/// The path identifies the user; a differing `userid` in the body is
/// ignored. An unusable body is reported as 404, the same as a missing
/// user.
#[utoipa::path(
    put,
    path = "/users/{userid}",
    params(("userid" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User does not exist or body is invalid", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{userid}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Result<web::Json<UserPayload>, actix_web::Error>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let payload = payload.map_err(|err| {
        debug!(userid = %id, error = %err, "unreadable user update body");
        Error::not_found(format!("user {id} cannot be updated: body is not a user record"))
    })?;
    let record = UserRecord::try_from(payload.into_inner()).map_err(|err| {
        Error::not_found(format!("user {id} cannot be updated: {err}"))
            .with_details(json!({ "missing": err.missing_fields() }))
    })?;
    let user = state.directory.update_user(&id, record).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete a user and drop it from every group.
#[utoipa::path(
    delete,
    path = "/users/{userid}",
    params(("userid" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User does not exist", body = Error),
        (status = 503, description = "Directory store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{userid}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = UserId::new(path.into_inner());
    state.directory.delete_user(&id).await?;
    Ok(web::Json(MessageResponse::new(
        "User has been deleted from data store",
    )))
}
