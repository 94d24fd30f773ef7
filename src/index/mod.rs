//! Name-to-archive index
//!
//! Scanning every archive on each start is what this module avoids. The
//! first run scans, records which archives hold each entry, and writes the
//! result to a cache file tagged with a caller-supplied fingerprint. Later
//! runs with the same fingerprint decode the file instead of scanning.
//!
//! Entries ending in `.class` are *components*; everything else is a
//! *resource*. Each entry maps to the archives containing it, in the order
//! the archives were given, so the first archive always wins a tie.

pub mod builder;
pub mod cache;
pub mod codec;
pub mod fingerprint;
pub mod location;
pub mod scanner;

pub use builder::{Index, IndexBuilder, IndexStats, Lookup};
pub use cache::{obtain_index, CacheStatus, IndexCache, IndexSource, ObtainedIndex};
pub use fingerprint::Fingerprint;
pub use location::{ArchiveLocation, EntryPath, COMPONENT_SUFFIX};
pub use scanner::scan_archive;
