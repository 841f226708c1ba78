use crate::error::ConfigError;
use crate::store::DEFAULT_MAX_VERSIONS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "DebateDissector";
const APPLICATION: &str = "dissector";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_SNAPSHOT_INTERVAL_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            enabled: true,
            interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// Minimum time between automatic snapshots of one document
    pub snapshot_interval_ms: u64,
    pub max_per_document: usize,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        VersionsConfig {
            snapshot_interval_ms: DEFAULT_SNAPSHOT_INTERVAL_MS,
            max_per_document: DEFAULT_MAX_VERSIONS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the platform data directory for the document store
    pub data_dir: Option<PathBuf>,
    pub autosave: AutosaveConfig,
    pub versions: VersionsConfig,
    /// Alias name to shell command
    pub aliases: BTreeMap<String, String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("store"))
}

impl Config {
    /// Store directory: the configured override or the platform default
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(default_data_dir)
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but falls back to the defaults on any error
    pub fn load_or_default(path: &Path) -> Config {
        match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{err}; using default configuration");
                Config::default()
            }
        }
    }

    /// Load from the platform config file
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = config_file_path().ok_or(ConfigError::NoConfigDir)?;
        Config::load(&path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml).map_err(write_err)
    }
}
