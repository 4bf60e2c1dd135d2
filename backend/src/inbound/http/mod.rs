//! HTTP inbound adapter exposing the directory REST endpoints.

use actix_web::web;

pub mod error;
pub mod groups;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register the user and group endpoints.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use directory::inbound::http::directory_routes;
///
/// let app = App::new().configure(directory_routes);
/// ```
pub fn directory_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(groups::create_group)
        .service(groups::get_group_members)
        .service(groups::update_group_membership)
        .service(groups::delete_group);
}
