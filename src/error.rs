//! Error types for arcindex
//!
//! All modules use `ArcIndexResult<T>` as their return type. Callers that need
//! to branch on the failure class (not found vs. I/O, for example) use
//! [`ArcIndexError::kind`] instead of matching individual variants.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for arcindex operations
pub type ArcIndexResult<T> = Result<T, ArcIndexError>;

/// Coarse failure classes callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An archive location is not local sealed content
    UnsupportedLocation,
    /// The cache file is stale or could not be decoded
    CacheInvalid,
    /// A freshly built index could not be persisted
    CacheWriteFailure,
    /// The requested name is not in the index
    NotFound,
    /// The index names an entry the archive does not contain
    IndexContentMismatch,
    /// Opening or reading an archive or file failed
    Io,
    /// Configuration could not be read or written
    Config,
    /// Anything else
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsupportedLocation => "unsupported-location",
            Self::CacheInvalid => "cache-invalid",
            Self::CacheWriteFailure => "cache-write-failure",
            Self::NotFound => "not-found",
            Self::IndexContentMismatch => "index-content-mismatch",
            Self::Io => "io",
            Self::Config => "config",
            Self::Internal => "internal",
        };
        write!(f, "{}", name)
    }
}

/// All errors that can occur in arcindex
#[derive(Error, Debug)]
pub enum ArcIndexError {
    // Location errors
    #[error("Unsupported archive location {location}: {reason}")]
    UnsupportedLocation { location: String, reason: String },

    // Cache errors
    #[error("Index cache {path} is invalid: {reason}")]
    CacheInvalid { path: PathBuf, reason: String },

    #[error("Failed to write index cache {path}: {reason}")]
    CacheWrite { path: PathBuf, reason: String },

    // Resolution errors
    #[error("No archive provides {0}")]
    NotFound(String),

    #[error("Index lists {entry} in {archive}, but the archive has no such entry")]
    IndexContentMismatch { archive: String, entry: String },

    #[error("Index references archive {0}, which is not bound to this resolver")]
    UnboundArchive(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {context}")]
    Archive {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl ArcIndexError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an archive format error with context
    pub fn archive(context: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create an unsupported location error
    pub fn unsupported(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedLocation {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedLocation { .. } => ErrorKind::UnsupportedLocation,
            Self::CacheInvalid { .. } => ErrorKind::CacheInvalid,
            Self::CacheWrite { .. } => ErrorKind::CacheWriteFailure,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::IndexContentMismatch { .. } | Self::UnboundArchive(_) => {
                ErrorKind::IndexContentMismatch
            }
            Self::Io { .. } | Self::Archive { .. } => ErrorKind::Io,
            Self::ConfigInvalid { .. } | Self::ConfigDirCreate { .. } => ErrorKind::Config,
            Self::Json(_) | Self::TomlSerialize(_) | Self::Internal(_) | Self::User(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Check if error is retryable
    ///
    /// Only I/O failures may succeed on a later attempt; everything else is
    /// determined by the index or the archive contents.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedLocation { .. } => {
                Some("Only local archive files (plain paths or file: URLs) are supported")
            }
            Self::IndexContentMismatch { .. } | Self::UnboundArchive(_) => {
                Some("The index is out of date. Run: arcindex index --rebuild")
            }
            Self::CacheWrite { .. } => Some("Check permissions on the cache directory"),
            _ => None,
        }
    }
}
