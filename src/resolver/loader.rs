//! Per-archive lazy handles
//!
//! A [`Loader`] exists for every bound archive from the start, but the
//! archive itself is opened only when an entry is first read. Concurrent
//! first reads may each open the archive; exactly one handle is installed
//! and the rest are dropped. Nobody waits on another thread's open.
//!
//! Installed handles live as long as the loader.

use crate::error::{ArcIndexError, ArcIndexResult};
use crate::index::scanner::entry_table;
use crate::index::{ArchiveLocation, EntryPath};
use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};
use zip::ZipArchive;

/// An open archive
pub struct ArchiveHandle {
    location: ArchiveLocation,
    /// Normalized entry path to central directory index
    entries: IndexMap<EntryPath, usize>,
    archive: Mutex<ZipArchive<BufReader<File>>>,
}

impl ArchiveHandle {
    fn open(location: &ArchiveLocation, path: &Path) -> ArcIndexResult<Self> {
        let file = File::open(path)
            .map_err(|e| ArcIndexError::io(format!("opening archive {}", path.display()), e))?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            ArcIndexError::archive(format!("reading archive {}", path.display()), e)
        })?;
        let entries = entry_table(&mut archive).map_err(|e| {
            ArcIndexError::archive(format!("listing entries of {}", path.display()), e)
        })?;

        Ok(Self {
            location: location.clone(),
            entries,
            archive: Mutex::new(archive),
        })
    }

    /// Read the full contents of `entry`
    ///
    /// An entry the archive does not contain is an index mismatch: the
    /// index said it was here.
    pub fn read_entry(&self, entry: &EntryPath) -> ArcIndexResult<Vec<u8>> {
        let Some(&index) = self.entries.get(entry) else {
            return Err(ArcIndexError::IndexContentMismatch {
                archive: self.location.to_string(),
                entry: entry.to_string(),
            });
        };

        let mut archive = self.archive.lock();
        let mut file = archive.by_index(index).map_err(|e| {
            ArcIndexError::archive(format!("reading {} from {}", entry, self.location), e)
        })?;

        let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut bytes).map_err(|e| {
            ArcIndexError::io(format!("reading {} from {}", entry, self.location), e)
        })?;
        Ok(bytes)
    }

    pub fn location(&self) -> &ArchiveLocation {
        &self.location
    }
}

/// Lazy, memoized handle to one archive
pub struct Loader {
    location: ArchiveLocation,
    path: PathBuf,
    slot: ArcSwapOption<ArchiveHandle>,
    opened: AtomicUsize,
    discarded: AtomicUsize,
}

impl Loader {
    /// Create a loader without opening the archive
    ///
    /// Fails immediately if `location` is not a local archive.
    pub fn new(location: ArchiveLocation) -> ArcIndexResult<Self> {
        let path = location.local_path()?;
        let path = std::path::absolute(&path).unwrap_or(path);

        Ok(Self {
            location,
            path,
            slot: ArcSwapOption::empty(),
            opened: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
        })
    }

    pub fn location(&self) -> &ArchiveLocation {
        &self.location
    }

    /// Absolute path of the archive file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The installed handle, opening the archive on first use
    pub fn handle(&self) -> ArcIndexResult<Arc<ArchiveHandle>> {
        if let Some(handle) = self.slot.load_full() {
            return Ok(handle);
        }

        let fresh = Arc::new(ArchiveHandle::open(&self.location, &self.path)?);
        self.opened.fetch_add(1, Ordering::Relaxed);

        let empty: Option<Arc<ArchiveHandle>> = None;
        let previous = self.slot.compare_and_swap(&empty, Some(Arc::clone(&fresh)));

        match &*previous {
            None => {
                debug!("Opened archive {}", self.location);
                Ok(fresh)
            }
            Some(winner) => {
                // Lost the race; our handle closes when `fresh` drops
                trace!("Discarding redundant handle for {}", self.location);
                self.discarded.fetch_add(1, Ordering::Relaxed);
                Ok(Arc::clone(winner))
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.slot.load().is_some()
    }

    /// How many times the archive was opened, including discarded opens
    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Handles still held by this loader: 0 before first use, 1 after
    pub fn retained_handles(&self) -> usize {
        // The two loads are separate; a concurrent open can briefly show
        // more discards than opens.
        self.opened_count()
            .saturating_sub(self.discarded.load(Ordering::Relaxed))
    }
}
