//! Application configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Working-time target configuration.
    #[serde(default)]
    pub targets: TargetConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origin allowed to send credentialed requests.
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_origin: default_frontend_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_frontend_origin() -> String {
    "http://localhost:5173".to_string()
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the JSON collections.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Bootstrap application password, hashed and persisted on first run.
    /// Ignored once a credential document exists.
    #[serde(default)]
    pub password: Option<String>,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: None,
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    604_800 // 7 days
}

/// Working-time target configuration for monthly reports.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Weekly working-time target in hours.
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: i64,
    /// Monthly target override in hours. Defaults to four weekly targets.
    #[serde(default)]
    pub monthly_override_hours: Option<i64>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            weekly_hours: default_weekly_hours(),
            monthly_override_hours: None,
        }
    }
}

fn default_weekly_hours() -> i64 {
    40
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ZEITSALDO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
