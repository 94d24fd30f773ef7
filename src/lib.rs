//! arcindex - cached archive index with lazy entry resolution
//!
//! Finds which of a fixed, ordered set of archives holds each named entry
//! without rescanning every archive on every start.
//!
//! ```rust,ignore
//! use arcindex::index::{ArchiveLocation, Fingerprint, IndexCache};
//! use arcindex::resolver::Resolver;
//!
//! let archives = vec![ArchiveLocation::new("lib/a.jar"), ArchiveLocation::new("lib/z.jar")];
//! let fingerprint = Fingerprint::of_archives(&archives)?;
//!
//! let obtained = IndexCache::at("class_index.dat").obtain(&fingerprint, &archives)?;
//! let resolver = Resolver::bind(obtained.index, &archives)?;
//!
//! let bytes = resolver.resolve_component_bytes("com.example.Main")?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod resolver;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ArcIndexError, ArcIndexResult, ErrorKind};
pub use index::{obtain_index, ArchiveLocation, EntryPath, Fingerprint, Index, IndexCache};
pub use resolver::{bind_resolver, EntryAddress, Resolver};
