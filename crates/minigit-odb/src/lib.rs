//! Loose object storage: read, write, and expand zlib-compressed objects.
//!
//! Each object lives at `objects/XX/YYYY...` where `XX` is the first two hex
//! chars of the OID and `YYYY...` the remaining 38. The file content is
//! zlib-compressed `"<kind> <size>\0<body>"`. Objects are immutable and
//! append-only; writing an existing OID is a no-op.

mod prefix;
mod read;
mod write;

use std::path::{Path, PathBuf};

use minigit_hash::ObjectId;

/// Interface to the loose object directory.
pub struct ObjectStore {
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Zlib compression level.
    compression_level: flate2::Compression,
}

impl ObjectStore {
    /// Open the object store at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
        }
    }

    /// Path to the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    /// Check if an object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    #[error("object {0} not found")]
    NotFound(String),

    #[error("short object id {prefix} is ambiguous ({count} matches)")]
    Ambiguous { prefix: String, count: usize },

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object parse error: {0}")]
    Object(#[from] minigit_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] minigit_hash::HashError),
}
