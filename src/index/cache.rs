//! Load-or-build index cache
//!
//! One cache file at a fixed location holds the last built index together
//! with the fingerprint it was built for.
//!
//! # Cache States
//!
//! | State | Action | Result |
//! |-------|--------|--------|
//! | No file | scan, write | Built |
//! | File, fingerprint matches | decode | Loaded |
//! | File, stale or corrupt | scan, overwrite | Built |
//!
//! Neither a bad cache file nor a failed write is fatal: the caller always
//! gets a usable index unless scanning itself fails.

use super::builder::{Index, IndexBuilder};
use super::codec;
use super::fingerprint::Fingerprint;
use super::location::ArchiveLocation;
use crate::error::{ArcIndexError, ArcIndexResult};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the cache inside its directory
pub const CACHE_FILE_NAME: &str = "class_index.dat";

/// Where an obtained index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Decoded from a valid cache file
    Loaded,
    /// Scanned from the archives; `persisted` is false if the write failed
    Built { persisted: bool },
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loaded => "loaded",
            Self::Built { persisted: true } => "built",
            Self::Built { persisted: false } => "built (not persisted)",
        };
        write!(f, "{}", name)
    }
}

/// An index plus how it was obtained
#[derive(Debug, Clone)]
pub struct ObtainedIndex {
    pub index: Index,
    pub source: IndexSource,
}

/// On-disk state of the cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
}

/// Cache file at a fixed path
#[derive(Debug, Clone)]
pub struct IndexCache {
    path: PathBuf,
    builder: IndexBuilder,
}

impl IndexCache {
    /// Cache at the default location
    pub fn new() -> Self {
        Self::at(Self::default_path())
    }

    /// Cache at a custom location
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            builder: IndexBuilder::new(),
        }
    }

    /// Use `builder` when the index has to be rebuilt
    pub fn with_builder(mut self, builder: IndexBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Default cache file path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arcindex")
            .join(CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached index, or build and persist a fresh one
    ///
    /// Fails only if the archives themselves cannot be scanned.
    pub fn obtain(
        &self,
        fingerprint: &Fingerprint,
        locations: &[ArchiveLocation],
    ) -> ArcIndexResult<ObtainedIndex> {
        if self.path.exists() {
            match self.load(fingerprint) {
                Ok(index) => {
                    info!("Loaded index from {}", self.path.display());
                    return Ok(ObtainedIndex {
                        index,
                        source: IndexSource::Loaded,
                    });
                }
                Err(e) => warn!("{}, rebuilding", e),
            }
        } else {
            debug!("No index cache at {}", self.path.display());
        }

        self.rebuild(fingerprint, locations)
    }

    /// Scan the archives and overwrite the cache file, ignoring its contents
    pub fn rebuild(
        &self,
        fingerprint: &Fingerprint,
        locations: &[ArchiveLocation],
    ) -> ArcIndexResult<ObtainedIndex> {
        let index = self.builder.build(locations)?;

        let persisted = match self.persist(fingerprint, &index) {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        };

        Ok(ObtainedIndex {
            index,
            source: IndexSource::Built { persisted },
        })
    }

    /// Read and validate the cache file
    pub fn load(&self, fingerprint: &Fingerprint) -> ArcIndexResult<Index> {
        let file = File::open(&self.path).map_err(|e| {
            ArcIndexError::io(format!("opening index cache {}", self.path.display()), e)
        })?;

        codec::decode(&mut BufReader::new(file), fingerprint.as_bytes()).map_err(|e| {
            ArcIndexError::CacheInvalid {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Encode `index` and replace the cache file with it
    pub fn persist(&self, fingerprint: &Fingerprint, index: &Index) -> ArcIndexResult<()> {
        let write_error = |reason: String| ArcIndexError::CacheWrite {
            path: self.path.clone(),
            reason,
        };

        let bytes = codec::encode_to_vec(fingerprint.as_bytes(), index)
            .map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        fs::write(&self.path, &bytes).map_err(|e| write_error(e.to_string()))?;

        debug!("Wrote {} byte index cache to {}", bytes.len(), self.path.display());
        Ok(())
    }

    pub fn status(&self) -> CacheStatus {
        let size_bytes = fs::metadata(&self.path).map(|m| m.len()).ok();
        CacheStatus {
            path: self.path.clone(),
            exists: size_bytes.is_some(),
            size_bytes: size_bytes.unwrap_or(0),
        }
    }

    /// Remove the cache file; returns whether one existed
    pub fn clear(&self) -> ArcIndexResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed index cache {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ArcIndexError::io(
                format!("removing index cache {}", self.path.display()),
                e,
            )),
        }
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Obtain an index through the cache at the default location
pub fn obtain_index(
    fingerprint: &Fingerprint,
    locations: &[ArchiveLocation],
) -> ArcIndexResult<Index> {
    IndexCache::new()
        .obtain(fingerprint, locations)
        .map(|obtained| obtained.index)
}
