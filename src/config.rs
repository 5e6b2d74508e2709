// Configuration loaded from YAML

use crate::sqlite::SqliteStorage;
use crate::storage::{FileStorage, Storage};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which storage backend holds the serialized store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
}

/// Persisted shape of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Flat,
    #[default]
    ByDate,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todostore")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: default_data_dir(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    /// Default config file location: `<config dir>/todostore/config.yaml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todostore")
            .join("config.yaml")
    }

    /// Load config from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))?;

        info!(path = ?path, backend = ?config.backend, layout = ?config.layout, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Failed to parse config YAML")?;
        Ok(config)
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        let storage: Box<dyn Storage> = match self.backend {
            Backend::File => Box::new(FileStorage::open(&self.data_dir)?),
            Backend::Sqlite => Box::new(SqliteStorage::open(&self.data_dir)?),
        };
        Ok(storage)
    }
}
