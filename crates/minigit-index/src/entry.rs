//! Index entry types.

use bstr::BString;
use minigit_hash::ObjectId;
use minigit_object::FileMode;

/// A single staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path relative to the worktree root, `/`-separated.
    pub path: BString,
    /// Object ID of the staged blob.
    pub oid: ObjectId,
    /// File mode.
    pub mode: FileMode,
    /// Cached stat data from the file system.
    pub stat: StatData,
}

/// File system stat data cached in the index for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size truncated to u32.
    pub size: u32,
}

impl StatData {
    /// Capture from file system metadata.
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            ctime_secs: meta.ctime() as u32,
            ctime_nsecs: meta.ctime_nsec() as u32,
            mtime_secs: meta.mtime() as u32,
            mtime_nsecs: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len() as u32,
        }
    }

    /// Capture from file system metadata (non-Unix fallback).
    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::time::UNIX_EPOCH;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        Self {
            ctime_secs: mtime.as_secs() as u32,
            ctime_nsecs: mtime.subsec_nanos(),
            mtime_secs: mtime.as_secs() as u32,
            mtime_nsecs: mtime.subsec_nanos(),
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
            size: meta.len() as u32,
        }
    }

    /// Check if the cached stat still matches current file metadata.
    ///
    /// A match means the file can be assumed unchanged without rehashing.
    pub fn matches(&self, meta: &std::fs::Metadata) -> bool {
        let other = Self::from_metadata(meta);

        if self.size != other.size {
            return false;
        }
        if self.mtime_secs != other.mtime_secs || self.mtime_nsecs != other.mtime_nsecs {
            return false;
        }
        if self.ctime_secs != other.ctime_secs || self.ctime_nsecs != other.ctime_nsecs {
            return false;
        }
        // Zero fields mean "unknown" on this platform.
        if self.ino != 0 && other.ino != 0 && self.ino != other.ino {
            return false;
        }
        if self.dev != 0 && other.dev != 0 && self.dev != other.dev {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_data_default_is_zeroed() {
        let stat = StatData::default();
        assert_eq!(stat.size, 0);
        assert_eq!(stat.mtime_secs, 0);
    }

    #[test]
    fn stat_matches_itself() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"contents").unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        let stat = StatData::from_metadata(&meta);
        assert!(stat.matches(&meta));
    }

    #[test]
    fn stat_mismatch_on_size_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"contents").unwrap();
        let stat = StatData::from_metadata(&std::fs::metadata(&path).unwrap());
        std::fs::write(&path, b"different length").unwrap();
        assert!(!stat.matches(&std::fs::metadata(&path).unwrap()));
    }
}
