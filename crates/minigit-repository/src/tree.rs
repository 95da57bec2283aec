//! Tree walking: depth-first flattening of tree objects into path maps.

use std::collections::BTreeMap;

use bstr::{BStr, BString, ByteSlice};
use minigit_hash::ObjectId;
use minigit_object::FileMode;

use crate::{RepoError, Repository};

/// A blob leaf in a flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLeaf {
    pub oid: ObjectId,
    pub mode: FileMode,
}

impl Repository {
    /// Flatten a tree into a map from full path (no leading slash) to blob
    /// leaf metadata. Sub-tree entries do not appear as leaves.
    pub fn walk_tree(&self, root: &ObjectId) -> Result<BTreeMap<BString, TreeLeaf>, RepoError> {
        let mut out = BTreeMap::new();
        self.walk_tree_into(root, b"", &mut out)?;
        Ok(out)
    }

    /// The flattened tree of the commit `HEAD` points at; empty when unborn.
    pub fn head_tree_files(&self) -> Result<BTreeMap<BString, TreeLeaf>, RepoError> {
        match self.head_tree_oid()? {
            Some(tree) => self.walk_tree(&tree),
            None => Ok(BTreeMap::new()),
        }
    }

    /// The flattened tree of an arbitrary commit.
    pub fn commit_tree_files(
        &self,
        commit: &ObjectId,
    ) -> Result<BTreeMap<BString, TreeLeaf>, RepoError> {
        let tree = self.read_commit(commit)?.tree;
        self.walk_tree(&tree)
    }

    /// Walk a tree by `/`-separated path components, returning the entry's
    /// OID and mode (a blob leaf or a sub-tree).
    pub fn lookup_tree_path(
        &self,
        root: &ObjectId,
        path: &BStr,
    ) -> Result<Option<(ObjectId, FileMode)>, RepoError> {
        let mut current = *root;
        let mut components = path.split_str("/").peekable();

        while let Some(component) = components.next() {
            if component.is_empty() {
                return Ok(None);
            }
            let tree = self.read_tree(&current)?;
            let Some(entry) = tree.find(component.as_bstr()) else {
                return Ok(None);
            };
            if components.peek().is_none() {
                return Ok(Some((entry.oid, entry.mode)));
            }
            if !entry.mode.is_tree() {
                return Ok(None);
            }
            current = entry.oid;
        }

        Ok(None)
    }

    fn walk_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &[u8],
        out: &mut BTreeMap<BString, TreeLeaf>,
    ) -> Result<(), RepoError> {
        let tree = self.read_tree(tree_oid)?;
        for entry in tree.iter() {
            let mut path = BString::from(prefix);
            path.extend_from_slice(&entry.name);
            if entry.mode.is_tree() {
                path.push(b'/');
                self.walk_tree_into(&entry.oid, &path, out)?;
            } else {
                out.insert(
                    path,
                    TreeLeaf {
                        oid: entry.oid,
                        mode: entry.mode,
                    },
                );
            }
        }
        Ok(())
    }
}
