//! Configuration management for ItemSearch services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Content database the default index is named after (master, web, ...)
    #[serde(default = "default_database")]
    pub database: String,

    /// Default index name; `{database}` is replaced by the lower-cased database name
    #[serde(default = "default_index_template")]
    pub index_name_template: String,

    /// System default language, used when neither the request nor the context supply one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Header carrying the current (context) language of a request
    #[serde(default = "default_language_header")]
    pub language_header: String,

    /// Upper bound on an explicit `first` (0 = unbounded); an absent `first` is never capped
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Directory of `<index name>.json` fixture files loaded into memory at startup
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_database() -> String { "web".to_string() }
fn default_index_template() -> String { "sitecore_{database}_index".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_language_header() -> String { "X-Context-Language".to_string() }
fn default_max_page_size() -> usize { 0 }
fn default_index_dir() -> String { "data/indexes".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "itemsearch".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            index_name_template: default_index_template(),
            default_language: default_language(),
            language_header: default_language_header(),
            max_page_size: default_max_page_size(),
            index_dir: default_index_dir(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

impl SearchConfig {
    /// Name of the index queried when a request does not name one
    pub fn default_index_name(&self) -> String {
        self.index_name_template
            .replace("{database}", &self.database.to_lowercase())
    }

    /// Page size cap, `None` when unbounded
    pub fn page_size_cap(&self) -> Option<usize> {
        (self.max_page_size > 0).then_some(self.max_page_size)
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SEARCH__DATABASE=master
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// How long in-flight requests may drain after a shutdown signal
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.default_language, "en");
        assert_eq!(config.search.language_header, "X-Context-Language");
    }

    #[test]
    fn test_default_index_name_lowercases_database() {
        let mut search = SearchConfig::default();
        assert_eq!(search.default_index_name(), "sitecore_web_index");

        search.database = "Master".to_string();
        assert_eq!(search.default_index_name(), "sitecore_master_index");
    }

    #[test]
    fn test_page_size_cap() {
        let mut search = SearchConfig::default();
        assert_eq!(search.page_size_cap(), None);

        search.max_page_size = 50;
        assert_eq!(search.page_size_cap(), Some(50));
    }

    #[test]
    fn test_shipped_default_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default");
        let config: AppConfig = Config::builder()
            .add_source(File::with_name(path))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.search.default_index_name(), "sitecore_web_index");
        assert_eq!(config.search.page_size_cap(), Some(100));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("search.database", "master")
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.search.database, "master");
        assert_eq!(config.search.index_name_template, "sitecore_{database}_index");
        assert_eq!(config.server.port, 8080);
    }
}
