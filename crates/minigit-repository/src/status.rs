//! The status engine: three-way comparison of HEAD × index × worktree.

use bstr::{BString, ByteSlice};
use std::collections::BTreeSet;

use crate::{RepoError, Repository};

/// Six disjoint path sets describing repository state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    /// In the index but not in HEAD's tree.
    pub staged_new: Vec<BString>,
    /// In both, with differing OIDs or modes.
    pub staged_modified: Vec<BString>,
    /// In HEAD's tree but not in the index.
    pub staged_deleted: Vec<BString>,
    /// Indexed, present in the worktree with differing content.
    pub unstaged_modified: Vec<BString>,
    /// Indexed but absent from the worktree.
    pub unstaged_deleted: Vec<BString>,
    /// In the worktree but not in the index.
    pub untracked: Vec<BString>,
}

impl Status {
    /// Nothing staged, nothing modified, nothing untracked?
    pub fn is_clean(&self) -> bool {
        self.staged_new.is_empty()
            && self.staged_modified.is_empty()
            && self.staged_deleted.is_empty()
            && self.unstaged_modified.is_empty()
            && self.unstaged_deleted.is_empty()
            && self.untracked.is_empty()
    }

    /// Anything staged for the next commit?
    pub fn has_staged_changes(&self) -> bool {
        !self.staged_new.is_empty()
            || !self.staged_modified.is_empty()
            || !self.staged_deleted.is_empty()
    }
}

impl Repository {
    /// Compute the current status.
    pub fn status(&self) -> Result<Status, RepoError> {
        let head = self.head_tree_files()?;
        let index = self.index()?;
        let mut status = Status::default();

        // HEAD vs index, by OID and mode.
        for entry in index.iter() {
            match head.get(&entry.path) {
                None => status.staged_new.push(entry.path.clone()),
                Some(leaf) if leaf.oid != entry.oid || leaf.mode != entry.mode => {
                    status.staged_modified.push(entry.path.clone());
                }
                Some(_) => {}
            }
        }
        for path in head.keys() {
            if index.get(path.as_bstr()).is_none() {
                status.staged_deleted.push(path.clone());
            }
        }

        // Index vs worktree, by recomputed blob OID (with a stat fast path).
        for entry in index.iter() {
            let full = self.worktree_file(entry.path.as_bstr());
            if let Ok(meta) = std::fs::symlink_metadata(&full) {
                if !meta.file_type().is_symlink() && entry.stat.matches(&meta) {
                    continue;
                }
            }
            match self.hash_worktree_file(entry.path.as_bstr())? {
                None => status.unstaged_deleted.push(entry.path.clone()),
                Some((oid, mode)) if oid != entry.oid || mode != entry.mode => {
                    status.unstaged_modified.push(entry.path.clone());
                }
                Some(_) => {}
            }
        }

        // Worktree paths not present in the index.
        let tracked: BTreeSet<&[u8]> = index.iter().map(|e| e.path.as_slice()).collect();
        for path in self.scan_worktree()? {
            if !tracked.contains(path.as_slice()) {
                status.untracked.push(path);
            }
        }

        Ok(status)
    }
}
