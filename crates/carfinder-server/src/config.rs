//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Deadline for the database work of a single request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    /// The per-request database deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite path or `file:` URI. Required.
    #[serde(default)]
    pub url: Option<String>,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "carfinder_catalog=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Neither `database.url` nor `DATABASE_URL` is set.
    #[error("database url is not configured (set database.url or DATABASE_URL)")]
    MissingDatabaseUrl,

    /// `server.request_timeout_ms` is zero; every request would time out.
    #[error("server.request_timeout_ms must be greater than zero")]
    ZeroRequestTimeout,
}

/// Config file used when neither the command line nor the environment
/// names one.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Where the config file path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// First command-line argument.
    CliArg,
    /// `CARFINDER_CONFIG_PATH`.
    EnvVar,
    /// [`DEFAULT_CONFIG_PATH`].
    Default,
}

impl ConfigSource {
    /// Short label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::CliArg => "cli-arg",
            ConfigSource::EnvVar => "env-var",
            ConfigSource::Default => "default",
        }
    }
}

/// Picks the config file path: a non-blank CLI argument, else a non-blank
/// `CARFINDER_CONFIG_PATH`, else [`DEFAULT_CONFIG_PATH`].
pub fn resolve_config_path(
    cli_arg: Option<String>,
    env_path: Option<String>,
) -> (String, ConfigSource) {
    let non_blank = |v: Option<String>| v.filter(|p| !p.trim().is_empty());

    if let Some(path) = non_blank(cli_arg) {
        (path, ConfigSource::CliArg)
    } else if let Some(path) = non_blank(env_path) {
        (path, ConfigSource::EnvVar)
    } else {
        (DEFAULT_CONFIG_PATH.to_string(), ConfigSource::Default)
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `CARFINDER_HOST` overrides `server.host`
/// - `CARFINDER_PORT` overrides `server.port`
/// - `CARFINDER_STATIC_DIR` overrides `server.static_dir`
/// - `CARFINDER_REQUEST_TIMEOUT_MS` overrides `server.request_timeout_ms`
/// - `DATABASE_URL` overrides `database.url`
/// - `CARFINDER_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `CARFINDER_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `CARFINDER_LOG_LEVEL` overrides `logging.level`
/// - `CARFINDER_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if no database URL ends up configured.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let contents = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                None
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => None,
    };

    resolve_config(contents.as_deref(), |key| std::env::var(key).ok())
}

/// Parses `contents` (if any), applies overrides from `env` and validates
/// the result.
///
/// # Errors
///
/// Returns `ConfigError::Parse` for invalid TOML,
/// `ConfigError::MissingDatabaseUrl` if no database URL is configured and
/// `ConfigError::ZeroRequestTimeout` for a zero request deadline.
pub fn resolve_config<F>(contents: Option<&str>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = match contents {
        Some(text) => toml::from_str(text)?,
        None => Config::default(),
    };

    if let Some(host) = env("CARFINDER_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("CARFINDER_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = env("CARFINDER_STATIC_DIR") {
        config.server.static_dir = dir;
    }
    if let Some(ms) = env("CARFINDER_REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = ms.parse() {
            config.server.request_timeout_ms = parsed;
        }
    }
    if let Some(url) = env("DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Some(ms) = env("CARFINDER_DB_BUSY_TIMEOUT_MS") {
        if let Ok(parsed) = ms.parse() {
            config.database.busy_timeout_ms = parsed;
        }
    }
    if let Some(size) = env("CARFINDER_DB_POOL_MAX_SIZE") {
        if let Ok(parsed) = size.parse() {
            config.database.pool_max_size = parsed;
        }
    }
    if let Some(level) = env("CARFINDER_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("CARFINDER_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if config.server.request_timeout_ms == 0 {
        return Err(ConfigError::ZeroRequestTimeout);
    }

    match config.database.url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(config),
        _ => Err(ConfigError::MissingDatabaseUrl),
    }
}
