//! Server configuration.
//!
//! Layered lowest to highest: built-in defaults, the TOML config file,
//! `WEEKCAL_*` environment variables. Command-line flags are applied on top
//! by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use weekcal_core::ConflictPolicy;
use weekcal_core::time_range::parse_timezone;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Applied to requests that leave out `timezone`.
    pub default_timezone: String,
    pub conflict_policy: ConflictPolicy,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec!["http://localhost:5173".to_string()],
            default_timezone: "UTC".to_string(),
            conflict_policy: ConflictPolicy::Allow,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// ~/.config/weekcal/config.toml (or the platform equivalent)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weekcal").join("config.toml"))
    }

    /// Load configuration. An explicit `path` must exist; the default path
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                if let Some(default_path) = Self::config_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        let config: ServerConfig = builder
            .add_source(
                Environment::with_prefix("WEEKCAL")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.default_timezone)
            .with_context(|| format!("Invalid default_timezone '{}'", self.default_timezone))?;
        Ok(())
    }
}
