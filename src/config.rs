//! Settings file and database path resolution.
//!
//! The database path comes from, in order: the `--db` flag, the
//! `FINTRACK_DB` environment variable (both handled by clap), the `database`
//! key of `config.toml`, and finally `<data dir>/fintrack.db`.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::report::DEFAULT_TOP_N;

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "fintrack.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// File the settings were read from; `None` when running on defaults.
    #[serde(skip)]
    pub(crate) source: Option<PathBuf>,
    pub(crate) database: Option<PathBuf>,
    /// How many categories `report top` shows when `-n` is not given.
    pub(crate) top_categories: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            database: None,
            top_categories: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    /// Load an explicit config file, or the platform default one. A missing
    /// default file yields the defaults; a missing explicit file is an error.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub(crate) fn load_from_file(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Pick the database file, creating the default data directory if needed.
    pub(crate) fn database_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path.or(self.database.as_deref()) {
            return Ok(crate::run::shellexpand(path));
        }
        let data_dir = project_dirs()?.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(data_dir.join(DB_FILE))
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fintrack", "fintrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs()
        .ok()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
