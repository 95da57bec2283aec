use std::path::{Path, PathBuf};

use minigit_hash::ObjectId;

use crate::loose;
use crate::name::RefName;
use crate::{RefError, Reference};

/// Maximum symbolic-ref chain length before giving up.
const MAX_SYMREF_DEPTH: usize = 10;

/// The files-backed reference store for one repository.
pub struct RefStore {
    minigit_dir: PathBuf,
}

impl RefStore {
    /// Open the ref store rooted at the repository metadata directory.
    pub fn new(minigit_dir: impl AsRef<Path>) -> Self {
        Self {
            minigit_dir: minigit_dir.as_ref().to_path_buf(),
        }
    }

    /// Read a ref without following symbolic targets.
    pub fn read_ref(&self, name: &RefName) -> Result<Option<Reference>, RefError> {
        loose::read_loose_ref(&self.minigit_dir, name)
    }

    /// Check whether a ref file exists.
    pub fn exists(&self, name: &RefName) -> bool {
        loose::loose_ref_path(&self.minigit_dir, name).is_file()
    }

    /// Set a ref to an OID (whole-file atomic replace).
    pub fn write_ref(&self, name: &RefName, oid: &ObjectId) -> Result<(), RefError> {
        loose::write_loose_ref(&self.minigit_dir, name, oid)
    }

    /// Set a symbolic ref to a target ref.
    pub fn write_symbolic(&self, name: &RefName, target: &RefName) -> Result<(), RefError> {
        loose::write_symbolic_ref(&self.minigit_dir, name, target)
    }

    /// Delete a ref, pruning empty parent directories.
    pub fn delete_ref(&self, name: &RefName) -> Result<(), RefError> {
        loose::delete_loose_ref(&self.minigit_dir, name)
    }

    /// Enumerate refs under a prefix directory (e.g. `refs/heads`), sorted
    /// byte-wise.
    pub fn list(&self, prefix: &str) -> Result<Vec<RefName>, RefError> {
        loose::enumerate_loose_refs(&self.minigit_dir, prefix)
    }

    /// Resolve a ref to its terminal OID, following symbolic chains.
    /// Returns `None` when the chain ends at an absent ref.
    pub fn resolve(&self, name: &RefName) -> Result<Option<ObjectId>, RefError> {
        let mut current = name.clone();
        for _ in 0..MAX_SYMREF_DEPTH {
            match self.read_ref(&current)? {
                None => return Ok(None),
                Some(Reference::Direct { target, .. }) => return Ok(Some(target)),
                Some(Reference::Symbolic { target, .. }) => current = target,
            }
        }
        Err(RefError::Parse(format!(
            "symbolic ref chain too deep starting at '{name}'"
        )))
    }

    /// Read `HEAD` itself (symbolic or direct).
    pub fn head_ref(&self) -> Result<Option<Reference>, RefError> {
        self.read_ref(&RefName::new("HEAD")?)
    }

    /// Resolve `HEAD` to an OID. `None` means an unborn branch: `HEAD`
    /// points at a ref that does not exist yet.
    pub fn resolve_head(&self) -> Result<Option<ObjectId>, RefError> {
        self.resolve(&RefName::new("HEAD")?)
    }

    /// The current branch short name, or `None` when `HEAD` is detached.
    pub fn current_branch(&self) -> Result<Option<String>, RefError> {
        match self.head_ref()? {
            Some(Reference::Symbolic { target, .. }) if target.is_branch() => {
                Ok(Some(target.short_name().to_string()))
            }
            _ => Ok(None),
        }
    }
}
