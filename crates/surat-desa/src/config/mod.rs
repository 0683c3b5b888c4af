//! Environment-driven settings for the portal service. A `.env` file is honoured
//! when present; real environment variables take precedence over it.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::portal::accounts::{DEFAULT_PASSWORD_ITERATIONS, DEFAULT_PASSWORD_MEMORY_KIB};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage the portal runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub security: SecurityConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: var("APP_ENV")
                .map(|raw| AppEnvironment::parse(&raw))
                .unwrap_or_default(),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env(),
            security: SecurityConfig::from_env()?,
            bootstrap_admin: BootstrapAdmin::from_env()?,
        })
    }
}

/// Listen address of the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = match var("APP_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort)?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// `localhost` maps to the IPv4 loopback; anything else must be a literal address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    fn from_env() -> Self {
        Self {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Argon2id cost: passes over memory and memory size in KiB.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub password_iterations: u32,
    pub password_memory_kib: u32,
}

impl SecurityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let password_iterations = positive("APP_PASSWORD_ITERATIONS", DEFAULT_PASSWORD_ITERATIONS)
            .ok_or(ConfigError::InvalidPasswordIterations)?;
        let password_memory_kib = positive("APP_PASSWORD_MEMORY_KIB", DEFAULT_PASSWORD_MEMORY_KIB)
            .ok_or(ConfigError::InvalidPasswordMemory)?;
        Ok(Self {
            password_iterations,
            password_memory_kib,
        })
    }
}

/// `default` when unset, `None` when set to anything but a positive integer.
fn positive(key: &str, default: u32) -> Option<u32> {
    match var(key) {
        Some(raw) => raw.parse::<u32>().ok().filter(|value| *value > 0),
        None => Some(default),
    }
}

/// Staff account seeded on startup so the admin surface is reachable on a fresh store.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub nik: String,
    pub nama: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("nik", &self.nik)
            .field("nama", &self.nama)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BootstrapAdmin {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        match (
            var("APP_ADMIN_NIK"),
            var("APP_ADMIN_NAMA"),
            var("APP_ADMIN_PASSWORD"),
        ) {
            (None, None, None) => Ok(None),
            (Some(nik), Some(nama), Some(password)) => Ok(Some(Self {
                nik,
                nama,
                password,
            })),
            _ => Err(ConfigError::IncompleteBootstrapAdmin),
        }
    }
}

/// Trimmed value of `key`; unset and blank are both `None`.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must be `localhost` or an IPv4/IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_PASSWORD_ITERATIONS must be a positive integer")]
    InvalidPasswordIterations,
    #[error("APP_PASSWORD_MEMORY_KIB must be a positive integer")]
    InvalidPasswordMemory,
    #[error("APP_ADMIN_NIK, APP_ADMIN_NAMA and APP_ADMIN_PASSWORD must be set together")]
    IncompleteBootstrapAdmin,
}
