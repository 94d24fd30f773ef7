//! Binary index encoding
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! fingerprint              N bytes, N known by the caller
//! i32 string_count
//! string × string_count    u16 byte length + UTF-8 bytes
//! i32 component_count
//! record × component_count i32 key, i32 value_count, i32 value × value_count
//! i32 resource_count
//! record × resource_count
//! ```
//!
//! Keys and values are indices into the string table. The table holds every
//! distinct string once, in first-occurrence order over component values,
//! component keys, resource values, then resource keys.

use super::builder::{Index, Lookup};
use super::location::{ArchiveLocation, EntryPath};
use indexmap::IndexSet;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Upper bound on capacity reserved from an untrusted count
const MAX_PREALLOC: usize = 4096;

/// Why a cache stream could not be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("stored fingerprint does not match")]
    FingerprintMismatch,

    #[error("unexpected end of data")]
    Truncated,

    #[error("negative {0} count")]
    NegativeCount(&'static str),

    #[error("string index {index} out of range (table has {len} strings)")]
    StringIndex { index: i32, len: usize },

    #[error("entry {0} has no archives")]
    EmptyEntry(String),

    #[error("entry {0} appears more than once")]
    DuplicateKey(String),

    #[error("string table entry is not valid UTF-8")]
    InvalidUtf8,

    #[error("read failed: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(e)
        }
    }
}

/// Why an index could not be encoded
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("string of {0} bytes exceeds the 65535 byte limit")]
    StringTooLong(usize),

    #[error("{0} count exceeds the format limit")]
    CountOverflow(&'static str),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Write `fingerprint` followed by the encoded `index`
pub fn encode<W: Write>(out: &mut W, fingerprint: &[u8], index: &Index) -> Result<(), EncodeError> {
    out.write_all(fingerprint)?;

    let table = string_table(index);
    write_count(out, table.len(), "string")?;
    for s in &table {
        write_string(out, s)?;
    }

    write_lookup(out, index.components(), &table)?;
    write_lookup(out, index.resources(), &table)?;
    Ok(())
}

/// Encode into a fresh buffer
pub fn encode_to_vec(fingerprint: &[u8], index: &Index) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode(&mut buf, fingerprint, index)?;
    Ok(buf)
}

/// Read an index, requiring the stored fingerprint to equal `fingerprint`
pub fn decode<R: Read>(input: &mut R, fingerprint: &[u8]) -> Result<Index, DecodeError> {
    let mut stored = vec![0u8; fingerprint.len()];
    input.read_exact(&mut stored)?;
    if stored != fingerprint {
        return Err(DecodeError::FingerprintMismatch);
    }

    let string_count = read_count(input, "string")?;
    let mut table = Vec::with_capacity(string_count.min(MAX_PREALLOC));
    for _ in 0..string_count {
        table.push(read_string(input)?);
    }

    let components = read_lookup(input, &table)?;
    let resources = read_lookup(input, &table)?;
    Ok(Index::from_lookups(components, resources))
}

fn string_table(index: &Index) -> IndexSet<&str> {
    let mut table = IndexSet::new();
    for lookup in [index.components(), index.resources()] {
        for archives in lookup.values() {
            table.extend(archives.iter().map(ArchiveLocation::as_str));
        }
        table.extend(lookup.keys().map(EntryPath::as_str));
    }
    table
}

fn write_lookup<W: Write>(
    out: &mut W,
    lookup: &Lookup,
    table: &IndexSet<&str>,
) -> Result<(), EncodeError> {
    write_count(out, lookup.len(), "entry")?;
    for (path, archives) in lookup {
        write_count(out, table_index(table, path.as_str()), "string")?;
        write_count(out, archives.len(), "archive")?;
        for archive in archives {
            write_count(out, table_index(table, archive.as_str()), "string")?;
        }
    }
    Ok(())
}

fn table_index(table: &IndexSet<&str>, s: &str) -> usize {
    // The table is built from the same index, so every string is present.
    table.get_index_of(s).unwrap_or_default()
}

fn write_count<W: Write>(out: &mut W, n: usize, what: &'static str) -> Result<(), EncodeError> {
    let n = i32::try_from(n).map_err(|_| EncodeError::CountOverflow(what))?;
    out.write_all(&n.to_be_bytes())?;
    Ok(())
}

fn write_string<W: Write>(out: &mut W, s: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(s.len()).map_err(|_| EncodeError::StringTooLong(s.len()))?;
    out.write_all(&len.to_be_bytes())?;
    out.write_all(s.as_bytes())?;
    Ok(())
}

fn read_lookup<R: Read>(input: &mut R, table: &[String]) -> Result<Lookup, DecodeError> {
    let entry_count = read_count(input, "entry")?;
    let mut lookup = Lookup::with_capacity(entry_count.min(MAX_PREALLOC));

    for _ in 0..entry_count {
        let key = lookup_string(table, read_i32(input)?)?;
        let value_count = read_count(input, "archive")?;
        if value_count == 0 {
            return Err(DecodeError::EmptyEntry(key.to_string()));
        }

        let mut archives = Vec::with_capacity(value_count.min(MAX_PREALLOC));
        for _ in 0..value_count {
            let archive = lookup_string(table, read_i32(input)?)?;
            archives.push(ArchiveLocation::new(archive));
        }
        if lookup.insert(EntryPath::new(key), archives).is_some() {
            return Err(DecodeError::DuplicateKey(key.to_string()));
        }
    }

    Ok(lookup)
}

fn lookup_string(table: &[String], index: i32) -> Result<&str, DecodeError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
        .ok_or(DecodeError::StringIndex {
            index,
            len: table.len(),
        })
}

fn read_i32<R: Read>(input: &mut R) -> Result<i32, DecodeError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_count<R: Read>(input: &mut R, what: &'static str) -> Result<usize, DecodeError> {
    let n = read_i32(input)?;
    usize::try_from(n).map_err(|_| DecodeError::NegativeCount(what))
}

fn read_string<R: Read>(input: &mut R) -> Result<String, DecodeError> {
    let mut len = [0u8; 2];
    input.read_exact(&mut len)?;
    let mut buf = vec![0u8; u16::from_be_bytes(len) as usize];
    input.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| DecodeError::InvalidUtf8)
}
