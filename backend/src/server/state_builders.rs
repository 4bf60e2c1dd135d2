//! Builds the directory service and the handler state over it.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use directory::domain::DirectoryService;
use directory::inbound::http::state::HttpState;
use directory::outbound::memory::InMemoryDirectoryRepository;
use directory::outbound::persistence::{DbPool, DieselDirectoryRepository};

/// Select the backing store and wrap it in a [`DirectoryService`].
///
/// A configured pool selects PostgreSQL; otherwise the in-memory store is
/// used.
pub fn build_http_state(db_pool: Option<&DbPool>) -> web::Data<HttpState> {
    let state = match db_pool {
        Some(pool) => {
            info!(store = "postgres", "directory store selected");
            let repository = Arc::new(DieselDirectoryRepository::new(pool.clone()));
            HttpState::from_service(Arc::new(DirectoryService::new(repository)))
        }
        None => {
            info!(store = "memory", "directory store selected");
            let repository = Arc::new(InMemoryDirectoryRepository::new());
            HttpState::from_service(Arc::new(DirectoryService::new(repository)))
        }
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory::domain::ports::{DirectoryCommand as _, DirectoryQuery as _};
    use directory::domain::{ErrorCode, UserId, UserRecord};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn memory_state_shares_one_store_between_ports() {
        let state = build_http_state(None);
        let record = UserRecord::try_from_parts(
            Some("jsmith".to_owned()),
            Some("Joe".to_owned()),
            Some("Smith".to_owned()),
            Some(vec!["admins".to_owned()]),
        )
        .expect("valid record");

        state.directory.create_user(record).await.expect("created");
        let user = state
            .directory_query
            .get_user(&UserId::new("jsmith"))
            .await
            .expect("visible through the query port");
        assert_eq!(user.first_name(), "Joe");

        let err = state
            .directory_query
            .get_user(&UserId::new("ghost"))
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
