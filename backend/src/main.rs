//! Directory service entry-point: loads configuration, selects the store,
//! and serves the REST API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use directory::inbound::http::health::HealthState;
use directory::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use directory::startup::{DirectorySettings, seed_demo_directory};
#[cfg(feature = "metrics")]
use server::make_metrics;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = DirectorySettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid host {}: {e}", settings.host()),
        )
    })?;

    let db_pool = connect_database(&settings).await?;

    let config = ServerConfig::new(bind_addr).with_db_pool(db_pool);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(match make_metrics() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            None
        }
    });

    let http_state = build_http_state(config.db_pool());
    seed_demo_directory(&settings, http_state.directory.as_ref())
        .await
        .map_err(|e| std::io::Error::other(format!("demo seeding failed: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    server.await
}

/// Open the PostgreSQL pool and apply migrations when a URL is configured.
async fn connect_database(settings: &DirectorySettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url() else {
        info!("no database url configured; using in-memory directory");
        return Ok(None);
    };

    if settings.run_migrations() {
        run_pending_migrations(url)
            .await
            .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
    Ok(Some(pool))
}
