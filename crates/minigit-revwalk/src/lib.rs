//! Revision resolution and commit-graph traversal.
//!
//! Evaluates revision expressions (`HEAD~2`, `v1.0^{commit}`,
//! `main:src/lib.rs`, short OIDs) against a repository, walks the commit
//! DAG for log output, and finds merge bases.

mod merge_base;
mod resolve;
mod walk;

pub use merge_base::{is_ancestor, merge_base};
pub use resolve::{resolve, resolve_commit};
pub use walk::RevWalk;

/// Errors from revision evaluation and traversal.
#[derive(Debug, thiserror::Error)]
pub enum RevWalkError {
    #[error("unknown revision: {0}")]
    Unknown(String),

    #[error("ambiguous revision: {0}")]
    Ambiguous(String),

    #[error("revision {0} does not name a commit")]
    NotACommit(String),

    #[error("path '{path}' does not exist in {rev}")]
    PathNotFound { rev: String, path: String },

    #[error(transparent)]
    Parse(#[from] minigit_object::ObjectError),

    #[error(transparent)]
    Repo(#[from] minigit_repository::RepoError),

    #[error(transparent)]
    Ref(#[from] minigit_ref::RefError),
}
