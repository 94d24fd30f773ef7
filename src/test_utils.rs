//! Shared fixtures for unit tests

use crate::index::ArchiveLocation;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a zip archive at `dir/name` holding `entries`
///
/// Entry names ending in `/` are written as directory entries.
pub fn write_archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> ArchiveLocation {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = || SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (entry, contents) in entries {
        if entry.ends_with('/') {
            writer.add_directory(*entry, options()).unwrap();
        } else {
            writer.start_file(*entry, options()).unwrap();
            writer.write_all(contents).unwrap();
        }
    }

    writer.finish().unwrap();
    ArchiveLocation::from(path)
}
