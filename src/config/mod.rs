use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::desk::DEFAULT_SIMILARITY_THRESHOLD;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub desk: DeskConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            desk: DeskConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// File locations and matching defaults for the lost-and-found desk.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub store_path: PathBuf,
    pub backup_path: PathBuf,
    pub audit_path: PathBuf,
    pub similarity_threshold: f64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("items_store.txt"),
            backup_path: PathBuf::from("items_store.bak"),
            audit_path: PathBuf::from("audit.log"),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl DeskConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let similarity_threshold = match env::var("DESK_SIMILARITY_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => defaults.similarity_threshold,
        };

        Ok(Self {
            store_path: env::var_os("DESK_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            backup_path: env::var_os("DESK_BACKUP_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.backup_path),
            audit_path: env::var_os("DESK_AUDIT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.audit_path),
            similarity_threshold,
        })
    }
}

/// Only a non-numeric value is an error; range checks happen when the desk
/// opens, which keeps the default for anything outside `[0, 1]`.
fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidThreshold {
            value: raw.to_string(),
        })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be an IP address or 'localhost'")
            }
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "DESK_SIMILARITY_THRESHOLD must be a number (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidThreshold { .. } => None,
        }
    }
}
