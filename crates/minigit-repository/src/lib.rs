//! Repository discovery, initialization, and the central handle tying the
//! object store, index, refs, and working tree together.

mod discover;
mod env;
mod error;
mod init;
mod state;
mod status;
mod tree;
mod worktree;

pub use env::Identity;
pub use error::RepoError;
pub use status::Status;
pub use tree::TreeLeaf;
pub use worktree::RestoreSource;

use std::path::{Path, PathBuf};

use minigit_hash::ObjectId;
use minigit_index::Index;
use minigit_object::{Commit, Object, Tree};
use minigit_odb::ObjectStore;
use minigit_ref::{RefName, RefStore, Reference};

/// Name of the repository metadata directory inside the worktree.
pub const MINIGIT_DIR: &str = ".minigit";

/// The central repository handle.
pub struct Repository {
    /// Path to the `.minigit` directory.
    minigit_dir: PathBuf,
    /// Path to the working tree root.
    work_tree: PathBuf,
    /// Object store.
    odb: ObjectStore,
    /// Reference store.
    refs: RefStore,
}

impl Repository {
    /// Open a repository whose worktree root is `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let work_tree = path.as_ref().to_path_buf();
        let minigit_dir = work_tree.join(MINIGIT_DIR);
        if !minigit_dir.join("HEAD").is_file() {
            return Err(RepoError::NotFound(work_tree));
        }
        Ok(Self::from_dirs(minigit_dir, work_tree))
    }

    /// Discover a repository by walking up from `start`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let (minigit_dir, work_tree) = discover::discover_from(start.as_ref())?;
        Ok(Self::from_dirs(minigit_dir, work_tree))
    }

    /// Initialize a new repository at `path` (the worktree root).
    /// Re-running on an existing repository is a safe no-op.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let work_tree = init::init_repository(path.as_ref())?;
        Self::open(work_tree)
    }

    fn from_dirs(minigit_dir: PathBuf, work_tree: PathBuf) -> Self {
        let odb = ObjectStore::open(minigit_dir.join("objects"));
        let refs = RefStore::new(&minigit_dir);
        Self {
            minigit_dir,
            work_tree,
            odb,
            refs,
        }
    }

    // --- Accessors ---

    /// Path to the `.minigit` directory.
    pub fn minigit_dir(&self) -> &Path {
        &self.minigit_dir
    }

    /// Path to the working tree root.
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Access the object store.
    pub fn odb(&self) -> &ObjectStore {
        &self.odb
    }

    /// Access the reference store.
    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    /// Path of the index file.
    pub fn index_path(&self) -> PathBuf {
        self.minigit_dir.join("index")
    }

    /// Load the index (empty when the file is missing).
    pub fn index(&self) -> Result<Index, RepoError> {
        Ok(Index::read_from(self.index_path())?)
    }

    /// Write the index atomically.
    pub fn write_index(&self, index: &Index) -> Result<(), RepoError> {
        Ok(index.write_to(self.index_path())?)
    }

    // --- HEAD helpers ---

    /// Resolve `HEAD` to a commit OID, `None` on an unborn branch.
    pub fn head_oid(&self) -> Result<Option<ObjectId>, RepoError> {
        Ok(self.refs.resolve_head()?)
    }

    /// Resolve `HEAD` or fail with `UnbornBranch`.
    pub fn require_head(&self) -> Result<ObjectId, RepoError> {
        self.head_oid()?.ok_or(RepoError::UnbornBranch)
    }

    /// Does `HEAD` point at a branch with no commits yet?
    pub fn is_unborn(&self) -> Result<bool, RepoError> {
        Ok(self.head_oid()?.is_none())
    }

    /// Is `HEAD` detached (a direct ref)?
    pub fn is_detached(&self) -> Result<bool, RepoError> {
        match self.refs.head_ref()? {
            Some(Reference::Direct { .. }) => Ok(true),
            _ => Ok(false),
        }
    }

    /// Move the current branch (or a detached `HEAD`) to a new commit.
    pub fn update_head_commit(&self, oid: &ObjectId) -> Result<(), RepoError> {
        match self.refs.head_ref()? {
            Some(Reference::Symbolic { target, .. }) => {
                self.refs.write_ref(&target, oid)?;
            }
            _ => {
                self.refs.write_ref(&RefName::new("HEAD")?, oid)?;
            }
        }
        Ok(())
    }

    // --- Typed object reads ---

    /// Read a commit, failing with `NotACommit` on any other kind.
    pub fn read_commit(&self, oid: &ObjectId) -> Result<Commit, RepoError> {
        match self.odb.read_object(oid)? {
            Object::Commit(c) => Ok(c),
            _ => Err(RepoError::NotACommit(oid.to_hex())),
        }
    }

    /// Read a tree, failing with `NotATree` on any other kind.
    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree, RepoError> {
        match self.odb.read_object(oid)? {
            Object::Tree(t) => Ok(t),
            _ => Err(RepoError::NotATree(oid.to_hex())),
        }
    }

    /// The tree OID of the commit `HEAD` points at, `None` when unborn.
    pub fn head_tree_oid(&self) -> Result<Option<ObjectId>, RepoError> {
        match self.head_oid()? {
            Some(head) => Ok(Some(self.read_commit(&head)?.tree)),
            None => Ok(None),
        }
    }
}
