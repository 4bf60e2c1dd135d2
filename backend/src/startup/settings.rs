//! Service configuration loaded via OrthoConfig.

use std::net::{AddrParseError, IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Configuration values for the directory service.
///
/// Every field can be set through `DIRECTORY_*` environment variables or a
/// configuration file. Scalar fields also accept command-line flags; the
/// boolean switches are read from the environment and files only.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DIRECTORY")]
pub struct DirectorySettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// Listening port; defaults to 8080.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the directory lives in process memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations at startup; defaults to true.
    #[ortho_config(skip_cli)]
    pub run_migrations: Option<bool>,
    /// Create the demo user `jsmith` at startup.
    #[ortho_config(default = false, skip_cli)]
    pub seed_demo: bool,
}

impl DirectorySettings {
    /// Interface to bind, falling back to `0.0.0.0`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Listening port, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address built from [`Self::host`] and [`Self::port`].
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host().parse()?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Database URL, treating a blank value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool ceiling, falling back to 10 connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether startup applies pending migrations. Unset means yes.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
