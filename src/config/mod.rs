//! Configuration loading and persistence
//!
//! The config file is optional. A missing file yields defaults; a file that
//! exists must parse and pass [`Config::validate`].

pub mod schema;

pub use schema::Config;

use crate::error::{ArcIndexError, ArcIndexResult};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Nothing at `path`; `explicit` when the path was given by the user
    Defaults { path: PathBuf, explicit: bool },
}

impl ConfigSource {
    /// Report the source once logging is up
    pub fn log(&self) {
        match self {
            Self::File(path) => debug!("Using config {}", path.display()),
            Self::Defaults {
                path,
                explicit: true,
            } => info!("Config file {} not found, using defaults", path.display()),
            Self::Defaults { path, .. } => {
                debug!("No config at {}, using defaults", path.display())
            }
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults { path, .. } => write!(f, "defaults ({} not found)", path.display()),
        }
    }
}

/// A configuration and its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Reads and writes the config file at one path
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Manager for the default config path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            explicit: false,
        }
    }

    /// Manager for a user-supplied path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    /// `<config dir>/arcindex/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arcindex")
            .join("config.toml")
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config file, falling back to defaults when it is absent
    pub async fn load(&self) -> ArcIndexResult<LoadedConfig> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => Ok(LoadedConfig {
                config: self.parse(&content)?,
                source: ConfigSource::File(self.config_path.clone()),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LoadedConfig {
                config: Config::default(),
                source: ConfigSource::Defaults {
                    path: self.config_path.clone(),
                    explicit: self.explicit,
                },
            }),
            Err(e) => Err(ArcIndexError::io(
                format!("reading config from {}", self.config_path.display()),
                e,
            )),
        }
    }

    fn parse(&self, content: &str) -> ArcIndexResult<Config> {
        let config: Config = toml::from_str(content).map_err(|e| self.invalid(e.to_string()))?;
        config.validate().map_err(|reason| self.invalid(reason))?;
        Ok(config)
    }

    /// Validate `config` and replace the file with it
    ///
    /// The new contents go to a sibling file first and are renamed into
    /// place, so readers never see a half-written config.
    pub async fn save(&self, config: &Config) -> ArcIndexResult<()> {
        config.validate().map_err(|reason| self.invalid(reason))?;
        let content = toml::to_string_pretty(config)?;

        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ArcIndexError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let staged = self.config_path.with_extension("toml.tmp");
        let write_error = |e: io::Error| {
            ArcIndexError::io(format!("writing config to {}", self.config_path.display()), e)
        };
        fs::write(&staged, content).await.map_err(write_error)?;
        fs::rename(&staged, &self.config_path)
            .await
            .map_err(write_error)?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    fn invalid(&self, reason: String) -> ArcIndexError {
        ArcIndexError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
