//! Merge-in-progress state files.
//!
//! A merge is in progress iff `MERGE_HEAD` exists. `MERGE_MSG` carries the
//! proposed merge commit message and `ORIG_HEAD` the pre-merge `HEAD` for
//! `--abort`.

use std::fs;

use bstr::BString;
use minigit_hash::ObjectId;
use minigit_utils::tempfile::write_atomic;

use crate::{RepoError, Repository};

impl Repository {
    /// Is a merge in progress?
    pub fn merge_in_progress(&self) -> bool {
        self.minigit_dir().join("MERGE_HEAD").is_file()
    }

    /// Read `MERGE_HEAD` if present.
    pub fn merge_head(&self) -> Result<Option<ObjectId>, RepoError> {
        self.read_state_oid("MERGE_HEAD")
    }

    /// Read `ORIG_HEAD` if present.
    pub fn orig_head(&self) -> Result<Option<ObjectId>, RepoError> {
        self.read_state_oid("ORIG_HEAD")
    }

    /// Read `MERGE_MSG` if present.
    pub fn merge_msg(&self) -> Result<Option<BString>, RepoError> {
        match fs::read(self.minigit_dir().join("MERGE_MSG")) {
            Ok(data) => Ok(Some(BString::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepoError::Io(e)),
        }
    }

    /// Write `MERGE_HEAD` and `MERGE_MSG`.
    pub fn write_merge_state(&self, theirs: &ObjectId, message: &[u8]) -> Result<(), RepoError> {
        write_atomic(
            self.minigit_dir().join("MERGE_HEAD"),
            format!("{}\n", theirs.to_hex()).as_bytes(),
        )?;
        write_atomic(self.minigit_dir().join("MERGE_MSG"), message)?;
        Ok(())
    }

    /// Write `ORIG_HEAD` (the `HEAD` prior to a merge).
    pub fn write_orig_head(&self, oid: &ObjectId) -> Result<(), RepoError> {
        write_atomic(
            self.minigit_dir().join("ORIG_HEAD"),
            format!("{}\n", oid.to_hex()).as_bytes(),
        )?;
        Ok(())
    }

    /// Remove `MERGE_HEAD` and `MERGE_MSG` (transition back to clean).
    pub fn clear_merge_state(&self) -> Result<(), RepoError> {
        for file in ["MERGE_HEAD", "MERGE_MSG"] {
            match fs::remove_file(self.minigit_dir().join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(RepoError::Io(e)),
            }
        }
        Ok(())
    }

    fn read_state_oid(&self, file: &str) -> Result<Option<ObjectId>, RepoError> {
        match fs::read_to_string(self.minigit_dir().join(file)) {
            Ok(data) => Ok(Some(ObjectId::from_hex(data.trim())?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepoError::Io(e)),
        }
    }
}
