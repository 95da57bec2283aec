//! Per-file three-way merge covering absent sides: add/add, delete/modify,
//! and unchallenged deletions.

use crate::content::{merge_content, ContentMergeResult, MergeLabels};

/// Result of merging one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMergeResult {
    /// Merged content; `None` means the file is absent from the result.
    pub content: Option<Vec<u8>>,
    /// Did this file produce a conflict?
    pub conflict: bool,
}

impl FileMergeResult {
    fn clean(content: Option<Vec<u8>>) -> Self {
        Self {
            content,
            conflict: false,
        }
    }

    fn conflicted(content: Option<Vec<u8>>) -> Self {
        Self {
            content,
            conflict: true,
        }
    }
}

/// Merge one file given optional base/ours/theirs contents.
pub fn merge_files(
    base: Option<&[u8]>,
    ours: Option<&[u8]>,
    theirs: Option<&[u8]>,
    labels: &MergeLabels<'_>,
) -> FileMergeResult {
    match (base, ours, theirs) {
        // Absent on both sides: absent from the result.
        (_, None, None) => FileMergeResult::clean(None),

        // Only ours has the file.
        (base, Some(ours), None) => match base {
            // Added by us alone.
            None => FileMergeResult::clean(Some(ours.to_vec())),
            // Their deletion of a file we did not touch.
            Some(b) if b == ours => FileMergeResult::clean(None),
            // Delete/modify: keep the modified side, flag the conflict.
            Some(_) => FileMergeResult::conflicted(Some(ours.to_vec())),
        },

        // Only theirs has the file (mirror of the above).
        (base, None, Some(theirs)) => match base {
            None => FileMergeResult::clean(Some(theirs.to_vec())),
            Some(b) if b == theirs => FileMergeResult::clean(None),
            Some(_) => FileMergeResult::conflicted(Some(theirs.to_vec())),
        },

        // Present on both sides.
        (base, Some(ours), Some(theirs)) => {
            let base = base.unwrap_or(b"");
            match merge_content(base, ours, theirs, labels) {
                ContentMergeResult::Clean(c) => FileMergeResult::clean(Some(c)),
                ContentMergeResult::Conflict(c) => FileMergeResult::conflicted(Some(c)),
            }
        }
    }
}
