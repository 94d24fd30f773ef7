//! Configuration schema for arcindex
//!
//! Configuration is stored at `~/.config/arcindex/config.toml`

use crate::index::{ArchiveLocation, IndexBuilder, IndexCache};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Index cache settings
    pub cache: CacheConfig,

    /// Archive scanning settings
    pub scan: ScanConfig,

    /// Default archive list
    pub archives: ArchivesConfig,
}

impl Config {
    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "general.log_format must be \"text\" or \"json\", got {:?}",
                self.general.log_format
            ));
        }
        if self.cache.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err("cache.path must not be empty".to_string());
        }
        if let Some(i) = self.archives.locations.iter().position(|l| l.trim().is_empty()) {
            return Err(format!("archives.locations[{}] is empty", i));
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Index cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Read and write the cache file; when false the index is always rebuilt
    pub enabled: bool,

    /// Cache file location (defaults to the user cache directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl CacheConfig {
    /// Resolved cache file path
    pub fn file_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(IndexCache::default_path)
    }
}

/// Archive scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scan archives concurrently
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ScanConfig {
    pub fn builder(&self) -> IndexBuilder {
        IndexBuilder::new().parallel(self.parallel)
    }
}

/// Archives used when none are given on the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchivesConfig {
    /// Archive locations, highest priority first
    pub locations: Vec<String>,
}

impl ArchivesConfig {
    pub fn locations(&self) -> Vec<ArchiveLocation> {
        self.locations.iter().map(|l| ArchiveLocation::new(l.as_str())).collect()
    }
}
