//! Locatable entry addresses

use crate::index::{ArchiveLocation, EntryPath};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where one copy of an entry lives, without its bytes
///
/// Displays as a `jar:file:` URL, e.g. `jar:file:/libs/a.jar!/data.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntryAddress {
    #[serde(serialize_with = "serialize_display")]
    archive: ArchiveLocation,
    archive_path: PathBuf,
    #[serde(serialize_with = "serialize_display")]
    entry: EntryPath,
}

impl EntryAddress {
    pub(crate) fn new(archive: ArchiveLocation, archive_path: PathBuf, entry: EntryPath) -> Self {
        Self {
            archive,
            archive_path,
            entry,
        }
    }

    /// The archive as named in the index
    pub fn archive(&self) -> &ArchiveLocation {
        &self.archive
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn entry(&self) -> &EntryPath {
        &self.entry
    }
}

impl fmt::Display for EntryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.archive_path.to_string_lossy().replace('\\', "/");
        let sep = if path.starts_with('/') { "" } else { "/" };
        write!(f, "jar:file:{}{}!/{}", sep, path, self.entry)
    }
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
