//! Optional demo record applied at startup.

use tracing::info;

use crate::domain::ports::DirectoryCommand;
use crate::domain::{Error, ErrorCode, UserRecord};
use crate::startup::DirectorySettings;

/// Identifier of the demo user.
pub const DEMO_USER_ID: &str = "jsmith";

/// Result of [`seed_demo_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoSeedOutcome {
    /// Seeding is disabled in configuration.
    Skipped,
    /// The demo user and its groups were created.
    Applied,
    /// The demo user already existed and was left untouched.
    AlreadyPresent,
}

fn demo_record() -> Result<UserRecord, Error> {
    UserRecord::try_from_parts(
        Some(DEMO_USER_ID.to_owned()),
        Some("Joe".to_owned()),
        Some("Smith".to_owned()),
        Some(vec!["admins".to_owned(), "users".to_owned()]),
    )
    .map_err(|err| Error::internal(format!("invalid demo record: {err}")))
}

/// Create `jsmith` (Joe Smith) in `admins` and `users` when enabled.
///
/// # Errors
///
/// Propagates directory errors other than the user already existing.
///
/// # Examples
///
/// ```rust,no_run
/// use std::ffi::OsString;
/// use std::sync::Arc;
///
/// use directory::domain::DirectoryService;
/// use directory::outbound::memory::InMemoryDirectoryRepository;
/// use directory::startup::{DirectorySettings, seed_demo_directory};
/// use ortho_config::OrthoConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = DirectorySettings::load_from_iter([OsString::from("directory")])?;
/// let service = DirectoryService::new(Arc::new(InMemoryDirectoryRepository::new()));
/// let outcome = seed_demo_directory(&settings, &service).await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
pub async fn seed_demo_directory(
    settings: &DirectorySettings,
    directory: &dyn DirectoryCommand,
) -> Result<DemoSeedOutcome, Error> {
    if !settings.seed_demo {
        info!(reason = "disabled", "demo seeding skipped");
        return Ok(DemoSeedOutcome::Skipped);
    }

    match directory.create_user(demo_record()?).await {
        Ok(user) => {
            info!(userid = %user.id(), groups = user.groups().len(), "demo user seeded");
            Ok(DemoSeedOutcome::Applied)
        }
        Err(err) if err.code() == ErrorCode::Conflict => {
            info!(userid = DEMO_USER_ID, "demo user already present; skipping");
            Ok(DemoSeedOutcome::AlreadyPresent)
        }
        Err(err) => Err(err),
    }
}
