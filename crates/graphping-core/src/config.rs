//! Configuration management for graphping.
//!
//! Loads configuration from ${GRAPHPING_HOME}/config.toml with sensible
//! defaults. Command-line flags override loaded values at dispatch time.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for graphping configuration and data directories.
    //!
    //! GRAPHPING_HOME resolution order:
    //! 1. GRAPHPING_HOME environment variable (if set)
    //! 2. ~/.config/graphping (default)

    use std::path::PathBuf;

    /// Returns the graphping home directory.
    ///
    /// Checks GRAPHPING_HOME env var first, falls back to ~/.config/graphping
    pub fn graphping_home() -> PathBuf {
        if let Ok(home) = std::env::var("GRAPHPING_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("graphping"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        graphping_home().join("config.toml")
    }

    /// Returns the path to the log directory.
    pub fn logs_dir() -> PathBuf {
        graphping_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint the probe dials (HTTP API root of the database).
    pub endpoint: String,

    /// Username for basic auth.
    pub username: String,

    /// Password for basic auth.
    pub password: String,

    /// Database name used in the transaction endpoint path.
    pub database: String,

    /// The fixed read-only query reissued on every tick.
    pub query: String,
}

impl Config {
    const DEFAULT_ENDPOINT: &str = "http://localhost:7474";
    const DEFAULT_USERNAME: &str = "neo4j";
    const DEFAULT_DATABASE: &str = "neo4j";
    const DEFAULT_QUERY: &str = "RETURN 1";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template if no config file exists yet.
    ///
    /// Returns the config path either way; an existing file is left alone.
    pub fn init() -> Result<PathBuf> {
        let path = paths::config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, default_config_template())
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
        }
        Ok(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            username: Self::DEFAULT_USERNAME.to_string(),
            password: String::new(),
            database: Self::DEFAULT_DATABASE.to_string(),
            query: Self::DEFAULT_QUERY.to_string(),
        }
    }
}

fn default_config_template() -> &'static str {
    r#"# graphping configuration

# Endpoint the probe dials (HTTP API root of the database)
endpoint = "http://localhost:7474"

# Basic auth credentials
username = "neo4j"
password = ""

# Database name used in the transaction endpoint path
database = "neo4j"

# The fixed read-only query reissued on every tick
query = "RETURN 1"
"#
}
