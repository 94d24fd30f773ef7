//! Index-backed entry resolution
//!
//! A [`Resolver`] answers "which archive has this entry, and what are its
//! bytes" using an [`Index`] instead of searching archives. Only the archive
//! that wins the lookup is ever opened, and each archive is opened at most
//! once for the life of the resolver.
//!
//! # Tie-breaking
//!
//! When several archives hold the same entry, the one listed first in the
//! index wins, which is the one given first when the index was built.
//!
//! # Misses
//!
//! | Operation | Name not indexed |
//! |-----------|------------------|
//! | `resolve_component_bytes` | `NotFound` error |
//! | `resolve_single_resource_handle` | `None` |
//! | `resolve_all_resource_handles` | empty iterator |

pub mod address;
pub mod loader;
pub mod sink;

pub use address::EntryAddress;
pub use loader::{ArchiveHandle, Loader};
pub use sink::ComponentSink;

use crate::error::{ArcIndexError, ArcIndexResult};
use crate::index::{ArchiveLocation, EntryPath, Index};
use std::collections::HashMap;
use std::iter::Chain;
use std::slice;
use std::sync::Arc;
use tracing::debug;

/// Resolves names against an index and a fixed set of archives
pub struct Resolver {
    index: Arc<Index>,
    loaders: HashMap<ArchiveLocation, Loader>,
}

impl Resolver {
    /// Bind `index` to the archives it was built from
    ///
    /// One loader is created per location; no archive is opened yet.
    pub fn bind(index: impl Into<Arc<Index>>, locations: &[ArchiveLocation]) -> ArcIndexResult<Self> {
        let mut loaders = HashMap::with_capacity(locations.len());
        for location in locations {
            if !loaders.contains_key(location) {
                loaders.insert(location.clone(), Loader::new(location.clone())?);
            }
        }

        Ok(Self {
            index: index.into(),
            loaders,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Loader for a bound archive
    pub fn loader(&self, location: &str) -> Option<&Loader> {
        self.loaders.get(location)
    }

    /// Bytes of the component named `qualified_name` (`a.b.C`)
    pub fn resolve_component_bytes(&self, qualified_name: &str) -> ArcIndexResult<Vec<u8>> {
        let path = EntryPath::for_component(qualified_name);
        let archive = self
            .index
            .component_archives(path.as_str())
            .first()
            .ok_or_else(|| ArcIndexError::NotFound(qualified_name.to_string()))?;

        debug!("Resolving {} from {}", qualified_name, archive);
        self.bound(archive)?.handle()?.read_entry(&path)
    }

    /// Resolve a component and hand its bytes to `sink`
    pub fn load_component<S: ComponentSink>(
        &self,
        qualified_name: &str,
        sink: &S,
    ) -> ArcIndexResult<S::Unit> {
        let bytes = self.resolve_component_bytes(qualified_name)?;
        sink.define(qualified_name, bytes)
    }

    /// Address of the first copy of `path`, resources before components
    pub fn resolve_single_resource_handle(&self, path: &str) -> Option<EntryAddress> {
        let archive = self
            .index
            .resource_archives(path)
            .first()
            .or_else(|| self.index.component_archives(path).first())?;

        self.address(archive, path)
    }

    /// Addresses of every copy of `path`: resource archives, then component
    /// archives, each in index order
    ///
    /// Archives that cannot be addressed are skipped.
    pub fn resolve_all_resource_handles<'a>(&'a self, path: &str) -> ResourceHandles<'a> {
        let archives = self
            .index
            .resource_archives(path)
            .iter()
            .chain(self.index.component_archives(path));

        ResourceHandles {
            resolver: self,
            path: path.to_string(),
            archives,
        }
    }

    /// Read the bytes behind an address
    pub fn open_address(&self, address: &EntryAddress) -> ArcIndexResult<Vec<u8>> {
        self.bound(address.archive())?
            .handle()?
            .read_entry(address.entry())
    }

    fn bound(&self, archive: &ArchiveLocation) -> ArcIndexResult<&Loader> {
        self.loaders
            .get(archive)
            .ok_or_else(|| ArcIndexError::UnboundArchive(archive.to_string()))
    }

    fn address(&self, archive: &ArchiveLocation, path: &str) -> Option<EntryAddress> {
        match self.loaders.get(archive) {
            Some(loader) => Some(EntryAddress::new(
                archive.clone(),
                loader.path().to_path_buf(),
                EntryPath::new(path),
            )),
            None => {
                debug!("Skipping {} in unbound archive {}", path, archive);
                None
            }
        }
    }
}

/// Bind a resolver; see [`Resolver::bind`]
pub fn bind_resolver(
    index: impl Into<Arc<Index>>,
    locations: &[ArchiveLocation],
) -> ArcIndexResult<Resolver> {
    Resolver::bind(index, locations)
}

/// Lazy iterator over every address of one path
pub struct ResourceHandles<'a> {
    resolver: &'a Resolver,
    path: String,
    archives: Chain<slice::Iter<'a, ArchiveLocation>, slice::Iter<'a, ArchiveLocation>>,
}

impl Iterator for ResourceHandles<'_> {
    type Item = EntryAddress;

    fn next(&mut self) -> Option<EntryAddress> {
        let Self {
            resolver,
            path,
            archives,
        } = self;
        archives.find_map(|archive| resolver.address(archive, path))
    }
}
