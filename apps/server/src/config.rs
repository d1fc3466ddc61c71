//! Server configuration.
//!
//! Layered in order: built-in defaults, an optional `hireboard.toml` in the
//! working directory (or the file named by `HIREBOARD_CONFIG`), then
//! `HIREBOARD__SECTION__KEY` environment variables. A `.env` file is loaded
//! into the environment first.

use std::net::SocketAddr;

use chrono::FixedOffset;
use hireboard_filter::{Composition, PagingDefaults};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body in bytes.
    pub max_request_body_size: usize,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_body_size: 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// `daily`, `hourly`, `minutely` or `never`.
    pub file_rotation: String,
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "./logs".to_string(),
            file_prefix: "hireboard".to_string(),
            file_rotation: "daily".to_string(),
            service_name: "hireboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_limit: u64,
    pub max_limit: u64,
    pub default_sort_by: String,
}

impl Default for PagingConfig {
    fn default() -> Self {
        let d = PagingDefaults::default();
        Self {
            default_limit: d.default_limit,
            max_limit: d.max_limit,
            default_sort_by: d.default_sort_by,
        }
    }
}

impl PagingConfig {
    pub fn defaults(&self) -> PagingDefaults {
        PagingDefaults {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            default_sort_by: self.default_sort_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// How different field filters combine.
    pub composition: Composition,
    /// Offset used for day boundaries of relative date windows.
    pub utc_offset_minutes: i32,
}

impl FiltersConfig {
    pub fn offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file of `{collection: [documents]}` loaded at startup.
    pub seed_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            paging: PagingConfig::default(),
            filters: FiltersConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let file = std::env::var("HIREBOARD_CONFIG").unwrap_or_else(|_| "hireboard".to_string());

        config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("HIREBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".into());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be non-zero".into());
        }
        if self.paging.default_limit == 0 || self.paging.max_limit == 0 {
            return Err("paging limits must be at least 1".into());
        }
        if self.paging.default_limit > self.paging.max_limit {
            return Err(format!(
                "paging.default_limit ({}) exceeds paging.max_limit ({})",
                self.paging.default_limit, self.paging.max_limit
            ));
        }
        if self.paging.default_sort_by.trim().is_empty() {
            return Err("paging.default_sort_by must not be empty".into());
        }
        if self.filters.offset().is_none() {
            return Err(format!(
                "filters.utc_offset_minutes out of range: {}",
                self.filters.utc_offset_minutes
            ));
        }
        match self.logging.file_rotation.as_str() {
            "daily" | "hourly" | "minutely" | "never" => {}
            other => return Err(format!("unknown logging.file_rotation '{other}'")),
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }
}
