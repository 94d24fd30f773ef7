//! Archive scanning
//!
//! Lists every regular-file entry of one local archive. The archive file is
//! opened for the duration of the scan only and released on every exit path.

use super::location::{ArchiveLocation, EntryPath};
use crate::error::{ArcIndexError, ArcIndexResult};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use tracing::debug;
use zip::result::ZipResult;
use zip::ZipArchive;

/// Normalized path of every regular entry, mapped to its position in the
/// archive's central directory
///
/// Raw names may carry a leading `/` or use `\` as a separator; lookups by
/// normalized path go through this table rather than the raw name. When two
/// raw names normalize to the same path, the first one wins.
pub(crate) fn entry_table<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> ZipResult<IndexMap<EntryPath, usize>> {
    let mut table = IndexMap::with_capacity(archive.len());

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if !entry.is_file() {
            continue;
        }
        if let Some(path) = EntryPath::normalize(entry.name()) {
            table.entry(path).or_insert(i);
        }
    }

    Ok(table)
}

/// Enumerate the regular entries of one archive
///
/// Order follows the archive's central directory, so repeated scans of the
/// same archive agree. Directory entries are skipped, and a name that appears
/// more than once is reported once.
pub fn scan_archive(location: &ArchiveLocation) -> ArcIndexResult<Vec<EntryPath>> {
    let path = location.local_path()?;

    let file = File::open(&path)
        .map_err(|e| ArcIndexError::io(format!("opening archive {}", path.display()), e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ArcIndexError::archive(format!("reading archive {}", path.display()), e))?;

    let entries: Vec<EntryPath> = entry_table(&mut archive)
        .map_err(|e| ArcIndexError::archive(format!("listing entries of {}", path.display()), e))?
        .into_keys()
        .collect();

    debug!("Scanned {} entries from {}", entries.len(), location);
    Ok(entries)
}
