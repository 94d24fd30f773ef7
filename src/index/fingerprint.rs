//! Cache fingerprints
//!
//! The index cache compares fingerprints byte for byte and never looks inside
//! them. [`Fingerprint::of_archives`] is one way to produce one; callers are
//! free to supply their own bytes instead.

use super::location::ArchiveLocation;
use crate::error::{ArcIndexError, ArcIndexResult};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;

/// Opaque identity of an archive set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 over each location string and its archive contents, in order
    pub fn of_archives(locations: &[ArchiveLocation]) -> ArcIndexResult<Self> {
        let mut hasher = Sha256::new();

        for location in locations {
            let path = location.local_path()?;
            let mut file = File::open(&path).map_err(|e| {
                ArcIndexError::io(format!("opening archive {}", path.display()), e)
            })?;

            hasher.update(location.as_str().as_bytes());
            hasher.update([0u8]);
            io::copy(&mut file, &mut hasher).map_err(|e| {
                ArcIndexError::io(format!("hashing archive {}", path.display()), e)
            })?;
        }

        Ok(Self(hasher.finalize().to_vec()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl From<Vec<u8>> for Fingerprint {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
