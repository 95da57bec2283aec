use std::path::PathBuf;

use bstr::BString;

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a minigit repository (or any parent): {0}")]
    NotFound(PathBuf),

    #[error("HEAD points at an unborn branch")]
    UnbornBranch,

    #[error("object {0} is not a commit")]
    NotACommit(String),

    #[error("object {0} is not a tree")]
    NotATree(String),

    #[error("path '{0}' not found")]
    PathNotFound(BString),

    #[error("your local changes to '{0}' would be overwritten")]
    LocalChangesWouldBeOverwritten(BString),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Util(#[from] minigit_utils::UtilError),

    #[error(transparent)]
    Hash(#[from] minigit_hash::HashError),

    #[error(transparent)]
    Object(#[from] minigit_object::ObjectError),

    #[error(transparent)]
    Odb(#[from] minigit_odb::OdbError),

    #[error(transparent)]
    Index(#[from] minigit_index::IndexError),

    #[error(transparent)]
    Ref(#[from] minigit_ref::RefError),
}
