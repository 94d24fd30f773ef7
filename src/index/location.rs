//! Archive locations and entry paths
//!
//! An [`ArchiveLocation`] is whatever string the caller used to name an
//! archive. It is stored verbatim in the index and only interpreted when a
//! local filesystem path is needed.

use crate::error::{ArcIndexError, ArcIndexResult};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

/// Suffix marking an entry as a loadable component
pub const COMPONENT_SUFFIX: &str = ".class";

/// Separator between namespace segments in a qualified component name
pub const NAMESPACE_SEPARATOR: char = '.';

/// Opaque, caller-supplied identifier for one sealed archive
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveLocation(String);

impl ArchiveLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this location to a local archive file
    ///
    /// Plain paths and `file:` URLs are local. Any other scheme, or a path
    /// that is a directory, fails with `UnsupportedLocation`.
    pub fn local_path(&self) -> ArcIndexResult<PathBuf> {
        let raw = self.0.as_str();

        let path = match url_scheme(raw) {
            Some(scheme) if scheme.eq_ignore_ascii_case("file") => {
                let rest = &raw[scheme.len() + 1..];
                // file:///abs and file:/abs both name /abs
                let rest = rest.strip_prefix("//").unwrap_or(rest);
                if !rest.starts_with('/') {
                    return Err(ArcIndexError::unsupported(
                        raw,
                        "file URLs with a host component are not supported",
                    ));
                }
                PathBuf::from(rest)
            }
            Some(scheme) => {
                return Err(ArcIndexError::unsupported(
                    raw,
                    format!("unsupported protocol '{}', must be 'file'", scheme),
                ));
            }
            None => PathBuf::from(raw),
        };

        if path.is_dir() {
            return Err(ArcIndexError::unsupported(
                raw,
                "location is a directory, not an archive file",
            ));
        }

        Ok(path)
    }
}

impl fmt::Display for ArchiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArchiveLocation {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArchiveLocation {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<PathBuf> for ArchiveLocation {
    fn from(path: PathBuf) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

impl Borrow<str> for ArchiveLocation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Scheme of a URL-like string, if it has one
///
/// Single-letter schemes are treated as Windows drive letters, not URLs.
fn url_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if scheme.len() < 2 || !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

/// Forward-slash, case-sensitive key of one entry inside an archive
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath(String);

impl EntryPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Normalize a raw archive entry name
    ///
    /// Returns `None` for names that are empty once normalized.
    pub fn normalize(raw: &str) -> Option<Self> {
        let path = raw.replace('\\', "/");
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            None
        } else {
            Some(Self(path.to_string()))
        }
    }

    /// Entry path of a qualified component name (`a.b.C` -> `a/b/C.class`)
    pub fn for_component(qualified_name: &str) -> Self {
        let mut path = qualified_name.replace(NAMESPACE_SEPARATOR, "/");
        path.push_str(COMPONENT_SUFFIX);
        Self(path)
    }

    /// Whether this entry follows the component naming convention
    pub fn is_component(&self) -> bool {
        self.0.ends_with(COMPONENT_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for EntryPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}
