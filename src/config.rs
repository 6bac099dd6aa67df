//! Configuration.
//!
//! Looked up in this order: an explicit path, `./relalg.toml`, then
//! `<config dir>/relalg/config.toml`. Missing files mean defaults.
//!
//! ```toml
//! notation = "latex"
//! schema = "sales"
//! # schema_file = "catalog.toml"   # wins over `schema`
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{RelalgError, RelalgResult};
use crate::schema::Schema;
use crate::transpiler::Notation;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "relalg.toml";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output notation.
    pub notation: Notation,
    /// Built-in schema name.
    pub schema: String,
    /// Path to a TOML schema file.
    pub schema_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notation: Notation::Unicode,
            schema: "store".to_string(),
            schema_file: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> RelalgResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| RelalgError::toml(path, e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `explicit` if given (it must exist), else from the first
    /// default location that exists, else return defaults.
    pub fn discover(explicit: Option<&Path>) -> RelalgResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(RelalgError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load(path);
        }

        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Default config locations, in lookup order.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("relalg").join("config.toml"));
        }
        paths
    }

    /// Build the schema this configuration points at.
    pub fn load_schema(&self) -> RelalgResult<Schema> {
        match &self.schema_file {
            Some(path) => Schema::load(path),
            None => Schema::builtin(&self.schema),
        }
    }
}
