//! Index construction from an ordered archive list

use super::location::{ArchiveLocation, EntryPath};
use super::scanner::scan_archive;
use crate::error::ArcIndexResult;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Entry path to the archives containing it, in archive input order
pub type Lookup = IndexMap<EntryPath, Vec<ArchiveLocation>>;

/// Name-to-archive index
///
/// Every value sequence is non-empty and ordered by the position of its
/// archives in the list the index was built from. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    components: Lookup,
    resources: Lookup,
}

/// Summary counts for an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub components: usize,
    pub resources: usize,
    /// Paths present in more than one archive
    pub shadowed: usize,
}

impl Index {
    pub(crate) fn from_lookups(components: Lookup, resources: Lookup) -> Self {
        Self {
            components,
            resources,
        }
    }

    pub fn components(&self) -> &Lookup {
        &self.components
    }

    pub fn resources(&self) -> &Lookup {
        &self.resources
    }

    /// Archives holding component entry `path`, earliest first
    pub fn component_archives(&self, path: &str) -> &[ArchiveLocation] {
        self.components.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Archives holding resource entry `path`, earliest first
    pub fn resource_archives(&self, path: &str) -> &[ArchiveLocation] {
        self.resources.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.resources.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let shadowed = self
            .components
            .values()
            .chain(self.resources.values())
            .filter(|archives| archives.len() > 1)
            .count();

        IndexStats {
            components: self.components.len(),
            resources: self.resources.len(),
            shadowed,
        }
    }

    fn record(&mut self, path: EntryPath, archive: &ArchiveLocation) {
        let lookup = if path.is_component() {
            &mut self.components
        } else {
            &mut self.resources
        };
        lookup.entry(path).or_default().push(archive.clone());
    }
}

/// Builds an [`Index`] by scanning every archive
#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder {
    parallel: bool,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Scan archives on the rayon pool instead of one after another
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Scan `locations` and index every entry
    ///
    /// The first unsupported or unreadable archive aborts the build. Scans
    /// may finish in any order; results are merged in input order.
    pub fn build(&self, locations: &[ArchiveLocation]) -> ArcIndexResult<Index> {
        debug!(
            "Indexing {} archives ({})",
            locations.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let scans: Vec<Vec<EntryPath>> = if self.parallel {
            locations.par_iter().map(scan_archive).collect::<ArcIndexResult<_>>()?
        } else {
            locations.iter().map(scan_archive).collect::<ArcIndexResult<_>>()?
        };

        let mut index = Index::default();
        for (location, entries) in locations.iter().zip(scans) {
            for path in entries {
                index.record(path, location);
            }
        }

        let stats = index.stats();
        info!(
            "Indexed {} components and {} resources from {} archives",
            stats.components,
            stats.resources,
            locations.len()
        );
        Ok(index)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
