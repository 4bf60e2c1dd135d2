//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DirectoryCommand, DirectoryQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub directory: Arc<dyn DirectoryCommand>,
    pub directory_query: Arc<dyn DirectoryQuery>,
}

impl HttpState {
    /// Construct state from explicit command and query ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use directory::domain::DirectoryService;
    /// use directory::inbound::http::state::HttpState;
    /// use directory::outbound::memory::InMemoryDirectoryRepository;
    ///
    /// let service = Arc::new(DirectoryService::new(Arc::new(
    ///     InMemoryDirectoryRepository::new(),
    /// )));
    /// let state = HttpState::new(service.clone(), service);
    /// let _ = state.directory_query.clone();
    /// ```
    pub fn new(
        directory: Arc<dyn DirectoryCommand>,
        directory_query: Arc<dyn DirectoryQuery>,
    ) -> Self {
        Self {
            directory,
            directory_query,
        }
    }

    /// Back both ports with one service instance.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: DirectoryCommand + DirectoryQuery + 'static,
    {
        Self {
            directory: service.clone(),
            directory_query: service,
        }
    }
}
