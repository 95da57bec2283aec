//! Working-tree reconciliation: staging, checkout, and path restore.
//!
//! The worktree is owned by the user; these operations are the only places
//! the engine creates, overwrites, or deletes files in it. A checkout
//! refuses to proceed when it would clobber uncommitted local changes.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use bstr::{BStr, BString, ByteSlice};
use minigit_hash::{Hasher, ObjectId};
use minigit_index::{Index, IndexEntry, StatData};
use minigit_object::{FileMode, ObjectType};
use minigit_utils::path as repo_path;

use crate::{RepoError, Repository, MINIGIT_DIR};

/// Where `restore_paths` copies content from.
#[derive(Debug, Clone, Copy)]
pub enum RestoreSource {
    /// The staging index (worktree-only restore).
    Index,
    /// A commit's tree (restores both worktree and index).
    Commit(ObjectId),
}

impl Repository {
    /// The platform path of a repo-relative file.
    pub fn worktree_file(&self, path: &BStr) -> PathBuf {
        repo_path::to_platform(self.work_tree(), path)
    }

    /// Hash the worktree content of a path without writing an object.
    ///
    /// Returns `None` when the path is absent (or not a file/symlink). A
    /// symlink hashes its link target as blob content with mode `120000`.
    pub fn hash_worktree_file(
        &self,
        path: &BStr,
    ) -> Result<Option<(ObjectId, FileMode)>, RepoError> {
        let full = self.worktree_file(path);
        let meta = match fs::symlink_metadata(&full) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::Io(e)),
        };

        if meta.file_type().is_symlink() {
            let target = link_target_bytes(&full)?;
            let oid = Hasher::hash_object("blob", &target)?;
            Ok(Some((oid, FileMode::Symlink)))
        } else if meta.is_file() {
            let content = fs::read(&full)?;
            let oid = Hasher::hash_object("blob", &content)?;
            Ok(Some((oid, file_mode_from_metadata(&meta))))
        } else {
            Ok(None)
        }
    }

    /// Stage one path: write its blob and upsert the index entry. A tracked
    /// path that is gone from the worktree stages the deletion instead.
    pub fn stage_path(&self, index: &mut Index, path: &BStr) -> Result<(), RepoError> {
        let full = self.worktree_file(path);
        let meta = match fs::symlink_metadata(&full) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if index.remove(path) {
                    return Ok(());
                }
                return Err(RepoError::PathNotFound(BString::from(path)));
            }
            Err(e) => return Err(RepoError::Io(e)),
        };

        let (content, mode) = if meta.file_type().is_symlink() {
            (link_target_bytes(&full)?, FileMode::Symlink)
        } else if meta.is_file() {
            (fs::read(&full)?, file_mode_from_metadata(&meta))
        } else {
            return Err(RepoError::PathNotFound(BString::from(path)));
        };

        let oid = self.odb().write_raw(ObjectType::Blob, &content)?;
        index.upsert(IndexEntry {
            path: BString::from(path),
            oid,
            mode,
            stat: StatData::from_metadata(&meta),
        });
        Ok(())
    }

    /// Stage every changed file in the worktree. With `update_only`, only
    /// already-tracked paths are refreshed; otherwise untracked files are
    /// added and entries for vanished files removed.
    pub fn stage_all(&self, index: &mut Index, update_only: bool) -> Result<(), RepoError> {
        let present = self.scan_worktree()?;

        for path in &present {
            let tracked = index.get(path.as_bstr()).is_some();
            if update_only && !tracked {
                continue;
            }
            // Stat fast path: an entry whose cached stat still matches is
            // assumed unchanged.
            if let Some(entry) = index.get(path.as_bstr()) {
                let full = self.worktree_file(path.as_bstr());
                if let Ok(meta) = fs::symlink_metadata(&full) {
                    if !meta.file_type().is_symlink() && entry.stat.matches(&meta) {
                        continue;
                    }
                }
            }
            self.stage_path(index, path.as_bstr())?;
        }

        if !update_only {
            let present_set: BTreeSet<&BStr> = present.iter().map(|p| p.as_bstr()).collect();
            let vanished: Vec<BString> = index
                .iter()
                .filter(|e| !present_set.contains(e.path.as_bstr()))
                .map(|e| e.path.clone())
                .collect();
            for path in vanished {
                index.remove(path.as_bstr());
            }
        }

        Ok(())
    }

    /// Enumerate worktree files (regular files and symlinks) as sorted
    /// repo-relative paths, excluding the `.minigit` directory.
    pub fn scan_worktree(&self) -> Result<Vec<BString>, RepoError> {
        let mut out = Vec::new();
        scan_dir(self.work_tree(), b"", true, &mut out)?;
        out.sort();
        Ok(out)
    }

    /// Make the worktree and index match `target_tree` exactly.
    ///
    /// Before mutating anything, every indexed file whose worktree content
    /// differs from its index OID *and* whose target OID differs from its
    /// index OID fails the checkout.
    pub fn checkout_tree(&self, target_tree: &ObjectId) -> Result<(), RepoError> {
        let index = self.index()?;
        let target = self.walk_tree(target_tree)?;

        for entry in index.iter() {
            let target_oid = target.get(&entry.path).map(|l| l.oid);
            if target_oid == Some(entry.oid) {
                continue;
            }
            if let Some((wt_oid, _)) = self.hash_worktree_file(entry.path.as_bstr())? {
                if wt_oid != entry.oid {
                    return Err(RepoError::LocalChangesWouldBeOverwritten(
                        entry.path.clone(),
                    ));
                }
            }
        }

        // Remove indexed files absent from the target.
        for entry in index.iter() {
            if !target.contains_key(&entry.path) {
                self.remove_worktree_file(entry.path.as_bstr())?;
            }
        }

        // Write target files that are new or changed relative to the index.
        for (path, leaf) in &target {
            match index.get(path.as_bstr()) {
                Some(entry) if entry.oid == leaf.oid => {
                    if entry.mode != leaf.mode {
                        self.apply_file_mode(path.as_bstr(), leaf.mode)?;
                    }
                }
                _ => {
                    self.write_worktree_file(path.as_bstr(), &leaf.oid, leaf.mode)?;
                }
            }
        }

        // Rewrite the index to mirror the target.
        let mut new_index = Index::new();
        for (path, leaf) in &target {
            new_index.upsert(self.entry_from_worktree(path.as_bstr(), leaf.oid, leaf.mode));
        }
        self.write_index(&new_index)?;

        Ok(())
    }

    /// Copy the requested paths from a source into the worktree (and, when
    /// the source is a commit, into the index).
    pub fn restore_paths(&self, source: RestoreSource, paths: &[BString]) -> Result<(), RepoError> {
        match source {
            RestoreSource::Index => {
                let index = self.index()?;
                for path in paths {
                    let entry = index
                        .get(path.as_bstr())
                        .ok_or_else(|| RepoError::PathNotFound(path.clone()))?;
                    self.write_worktree_file(path.as_bstr(), &entry.oid, entry.mode)?;
                }
            }
            RestoreSource::Commit(commit) => {
                let files = self.commit_tree_files(&commit)?;
                let mut index = self.index()?;
                for path in paths {
                    let leaf = files
                        .get(path)
                        .ok_or_else(|| RepoError::PathNotFound(path.clone()))?;
                    self.write_worktree_file(path.as_bstr(), &leaf.oid, leaf.mode)?;
                    index.upsert(self.entry_from_worktree(path.as_bstr(), leaf.oid, leaf.mode));
                }
                self.write_index(&index)?;
            }
        }
        Ok(())
    }

    /// Write a blob into the worktree with the right mode bits.
    pub fn write_worktree_file(
        &self,
        path: &BStr,
        oid: &ObjectId,
        mode: FileMode,
    ) -> Result<(), RepoError> {
        let (_, body) = self.odb().read(oid)?;
        let full = self.worktree_file(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        // Replace rather than write-through: the existing path may be a
        // symlink.
        match fs::remove_file(&full) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(RepoError::Io(e)),
        }

        if mode.is_symlink() {
            write_symlink(&body, &full)?;
        } else {
            fs::write(&full, &body)?;
            self.apply_file_mode(path, mode)?;
        }
        Ok(())
    }

    /// Set the executable bit to match a file mode.
    fn apply_file_mode(&self, path: &BStr, mode: FileMode) -> Result<(), RepoError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if mode.is_symlink() {
                return Ok(());
            }
            let full = self.worktree_file(path);
            let bits = if mode == FileMode::Executable { 0o755 } else { 0o644 };
            fs::set_permissions(&full, fs::Permissions::from_mode(bits))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
        }
        Ok(())
    }

    /// Remove a worktree file and prune now-empty parent directories up to
    /// (not including) the worktree root.
    pub fn remove_worktree_file(&self, path: &BStr) -> Result<(), RepoError> {
        let full = self.worktree_file(path);
        match fs::remove_file(&full) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(RepoError::Io(e)),
        }

        let mut dir = full.parent().map(|p| p.to_path_buf());
        while let Some(d) = dir {
            if d == self.work_tree() || !d.starts_with(self.work_tree()) {
                break;
            }
            let is_empty = d
                .read_dir()
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                break;
            }
            let _ = fs::remove_dir(&d);
            dir = d.parent().map(|p| p.to_path_buf());
        }
        Ok(())
    }

    /// Build an index entry for a path just written to the worktree.
    pub fn entry_from_worktree(&self, path: &BStr, oid: ObjectId, mode: FileMode) -> IndexEntry {
        let stat = fs::symlink_metadata(self.worktree_file(path))
            .map(|meta| StatData::from_metadata(&meta))
            .unwrap_or_default();
        IndexEntry {
            path: BString::from(path),
            oid,
            mode,
            stat,
        }
    }
}

/// Recursively collect files under `dir`, skipping `.minigit` at the root.
fn scan_dir(
    dir: &Path,
    prefix: &[u8],
    is_root: bool,
    out: &mut Vec<BString>,
) -> Result<(), RepoError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else {
            continue;
        };
        if is_root && name_str == MINIGIT_DIR {
            continue;
        }

        let mut rel = BString::from(prefix);
        rel.extend_from_slice(name_str.as_bytes());

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            rel.push(b'/');
            scan_dir(&entry.path(), &rel, false, out)?;
        } else if file_type.is_file() || file_type.is_symlink() {
            out.push(rel);
        }
    }
    Ok(())
}

/// The bytes of a symlink's target.
fn link_target_bytes(full: &Path) -> Result<Vec<u8>, RepoError> {
    let target = fs::read_link(full)?;
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Ok(target.as_os_str().as_bytes().to_vec())
    }
    #[cfg(not(unix))]
    {
        Ok(target.to_string_lossy().into_owned().into_bytes())
    }
}

/// Create a symlink whose target is `body`.
fn write_symlink(body: &[u8], full: &Path) -> Result<(), RepoError> {
    #[cfg(unix)]
    {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        std::os::unix::fs::symlink(OsStr::from_bytes(body), full)?;
        Ok(())
    }
    #[cfg(not(unix))]
    {
        // Without symlink support, materialize the target path as content.
        fs::write(full, body)?;
        Ok(())
    }
}

fn file_mode_from_metadata(meta: &fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 != 0 {
            return FileMode::Executable;
        }
    }
    let _ = meta;
    FileMode::Regular
}
