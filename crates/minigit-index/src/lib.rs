//! The staging index.
//!
//! Reading, writing, and manipulation of the binary index file sitting
//! between the working tree and the object store. Entries are kept sorted
//! ascending by path (byte-wise) with one entry per path.

mod entry;
mod read;
mod write;

use std::path::Path;

use bstr::{BStr, ByteSlice};
use minigit_hash::ObjectId;
use minigit_odb::ObjectStore;

pub use entry::{IndexEntry, StatData};

/// Errors from index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid index header: {0}")]
    InvalidHeader(String),

    #[error("unsupported index version: {0}")]
    UnsupportedVersion(u32),

    #[error("index checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid index entry at offset {offset}: {reason}")]
    InvalidEntry { offset: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Odb(#[from] minigit_odb::OdbError),

    #[error(transparent)]
    Util(#[from] minigit_utils::UtilError),
}

/// The staging index: a sorted set of entries, one per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Read the index from a file. A missing file yields an empty index.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let file = match std::fs::File::open(path.as_ref()) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(IndexError::Io(e)),
        };
        let data = unsafe { memmap2::Mmap::map(&file) }?;
        read::parse_index(&data)
    }

    /// Write the index to a file atomically (temp sibling + rename).
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        write::write_index(self, path.as_ref())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by path.
    pub fn get(&self, path: &BStr) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by(|e| e.path.as_bstr().cmp(path))
            .ok()
            .map(|pos| &self.entries[pos])
    }

    /// Add or replace the entry for a path, keeping sorted order.
    pub fn upsert(&mut self, entry: IndexEntry) {
        match self
            .entries
            .binary_search_by(|e| e.path.as_bstr().cmp(entry.path.as_bstr()))
        {
            Ok(pos) => self.entries[pos] = entry,
            Err(pos) => self.entries.insert(pos, entry),
        }
    }

    /// Remove the entry for a path. Returns true if one was removed.
    pub fn remove(&mut self, path: &BStr) -> bool {
        match self
            .entries
            .binary_search_by(|e| e.path.as_bstr().cmp(path))
        {
            Ok(pos) => {
                self.entries.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Iterate entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// All entries in sorted order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Build nested tree objects from the entries, writing each sub-tree to
    /// the store, and return the root tree OID.
    pub fn write_tree(&self, odb: &ObjectStore) -> Result<ObjectId, IndexError> {
        write::write_tree_from_index(self, odb)
    }

    /// Replace the entry list wholesale (entries are re-sorted).
    pub fn replace_entries(&mut self, mut entries: Vec<IndexEntry>) {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        self.entries = entries;
    }
}
