//! Configuration management
//!
//! Every section carries serde defaults so the service starts with no
//! configuration at all. Overrides come from environment variables with an
//! `APP` prefix and `__` separator, e.g. `APP__SERVER__PORT=8081`. The
//! classifier endpoint additionally honors the conventional
//! `AI_SERVICE_URL` variable.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_rust_log")]
    pub rust_log: String,

    /// Request timeout applied by the router middleware
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL, or the literal "memory" for the
    /// in-process store
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the external classification service
    #[serde(default = "default_classifier_url")]
    pub base_url: String,

    /// Bound on the whole classify call; on expiry the fallback engages
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_rust_log() -> String {
    "info,paperinsight=debug".to_string()
}
fn default_request_timeout() -> u64 {
    90
}
fn default_database_url() -> String {
    "memory".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    30
}
fn default_classifier_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_classifier_timeout() -> u64 {
    60
}
fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}
fn default_allowed_mime_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rust_log: default_rust_log(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_url(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            classifier: ClassifierConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn build() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // AI_SERVICE_URL is the conventional name used by deployments
            // of the classification service
            .set_override_option("classifier.base_url", std::env::var("AI_SERVICE_URL").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
