//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::DirectoryService;
use crate::inbound::http::error::json_config;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::directory_routes;
use crate::outbound::memory::InMemoryDirectoryRepository;

/// Build handler state over a fresh in-memory directory.
pub fn in_memory_state() -> HttpState {
    let repository = Arc::new(InMemoryDirectoryRepository::new());
    HttpState::from_service(Arc::new(DirectoryService::new(repository)))
}

/// App exposing every directory route over `state`.
pub fn directory_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .configure(directory_routes)
}
