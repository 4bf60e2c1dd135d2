//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every directory endpoint together with the request
//! and response bodies they exchange. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::groups::{
    GroupMembersResponse, GroupPayload, GroupResponse, MembershipPayload,
};
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::users::{UserPayload, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Directory service API",
        description = "Users, groups, and their mirrored memberships.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::get_group_members,
        crate::inbound::http::groups::update_group_membership,
        crate::inbound::http::groups::delete_group,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserPayload,
        UserResponse,
        GroupPayload,
        MembershipPayload,
        GroupResponse,
        GroupMembersResponse,
        MessageResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "User records and their group lists"),
        (name = "groups", description = "Groups and their member lists"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema shapes.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        components
            .schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/users")]
    #[case("/users/{userid}")]
    #[case("/groups")]
    #[case("/groups/{name}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn openapi_registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("UserPayload", &["userid", "first_name", "last_name", "groups"])]
    #[case("UserResponse", &["userid", "first_name", "last_name", "groups"])]
    #[case("GroupResponse", &["name", "members"])]
    #[case("GroupMembersResponse", &["members"])]
    #[case("MessageResponse", &["message"])]
    fn openapi_schema_has_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let schema = schema(name);
        for field in fields {
            assert_object_schema_has_field(&schema, field);
        }
    }

    #[rstest]
    fn user_item_routes_expose_all_methods() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/users/{userid}").expect("user path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
