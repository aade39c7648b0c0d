//! Configuration management for the genres service.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (GENRES__ prefix, `__` separator)
//! 2. Config file (genres.toml, or the prefix given on the command line)
//! 3. Defaults

use serde::Deserialize;

use crate::error::GenresError;

/// Top-level service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Neo4j connection settings (`[neo4j]` section).
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    /// Default log filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Connection settings for the Neo4j store.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Upper bound on pooled bolt connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Rows pulled per fetch from a result stream.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

impl Settings {
    /// Load settings from an optional config file and `GENRES__` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, GenresError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("GENRES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "genres-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            neo4j: Neo4jSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}
