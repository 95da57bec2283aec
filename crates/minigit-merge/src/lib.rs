//! The merge engine.
//!
//! Three layers: line-level three-way content merge with conflict markers,
//! per-file merge handling absent sides, and the whole-repository merge
//! operation with fast-forward detection and merge-state bookkeeping.

mod content;
mod files;
mod strategy;

pub use content::{merge_content, ContentMergeResult, MergeLabels};
pub use files::{merge_files, FileMergeResult};
pub use strategy::{abort_merge, merge_with_head, MergeOptions, MergeOutcome};

/// Errors from merge operations.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("cannot merge into an unborn branch")]
    UnbornHead,

    #[error("refusing to merge unrelated histories")]
    NoMergeBase,

    #[error("there is no merge to abort")]
    NothingToAbort,

    #[error(transparent)]
    Repo(#[from] minigit_repository::RepoError),

    #[error(transparent)]
    RevWalk(#[from] minigit_revwalk::RevWalkError),

    #[error(transparent)]
    Index(#[from] minigit_index::IndexError),

    #[error(transparent)]
    Odb(#[from] minigit_odb::OdbError),
}
