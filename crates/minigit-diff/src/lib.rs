//! The diff engine: Myers line diff, hunk assembly with context, and
//! unified-diff formatting.

pub mod algorithm;
pub mod unified;

use bstr::BString;
use minigit_object::FileMode;

/// Default number of context lines around a change.
pub const DEFAULT_CONTEXT: usize = 3;

/// One output line of a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Line present on both sides.
    Context(BString),
    /// Line present only in the new version.
    Addition(BString),
    /// Line present only in the old version.
    Deletion(BString),
}

/// A contiguous group of changes with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based first line of the hunk in the old file (0 when the hunk has
    /// no old lines).
    pub old_start: u32,
    pub old_count: u32,
    /// 1-based first line of the hunk in the new file (0 when the hunk has
    /// no new lines).
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

/// How a file changed between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

/// A single file's diff, ready for unified formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: BString,
    pub status: FileStatus,
    pub old_mode: Option<FileMode>,
    pub new_mode: Option<FileMode>,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Compute the diff of one file from optional old/new contents.
    ///
    /// `None` content means the file is absent on that side. Content with a
    /// NUL byte is treated as binary and produces no hunks.
    pub fn compute(
        path: impl Into<BString>,
        old: Option<(&[u8], FileMode)>,
        new: Option<(&[u8], FileMode)>,
        context: usize,
    ) -> Option<Self> {
        let status = match (&old, &new) {
            (None, None) => return None,
            (None, Some(_)) => FileStatus::Added,
            (Some(_), None) => FileStatus::Deleted,
            (Some((o, om)), Some((n, nm))) => {
                if o == n && om == nm {
                    return None;
                }
                FileStatus::Modified
            }
        };

        let old_bytes = old.map(|(c, _)| c).unwrap_or(b"");
        let new_bytes = new.map(|(c, _)| c).unwrap_or(b"");
        let is_binary = is_binary(old_bytes) || is_binary(new_bytes);

        let hunks = if is_binary {
            Vec::new()
        } else {
            algorithm::diff_hunks(old_bytes, new_bytes, context)
        };

        Some(Self {
            path: path.into(),
            status,
            old_mode: old.map(|(_, m)| m),
            new_mode: new.map(|(_, m)| m),
            is_binary,
            hunks,
        })
    }
}

/// Binary detection: the content contains a NUL byte.
pub fn is_binary(content: &[u8]) -> bool {
    content.contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sides_yield_no_diff() {
        let diff = FileDiff::compute(
            "a.txt",
            Some((b"same\n", FileMode::Regular)),
            Some((b"same\n", FileMode::Regular)),
            DEFAULT_CONTEXT,
        );
        assert!(diff.is_none());
    }

    #[test]
    fn mode_only_change_is_a_diff() {
        let diff = FileDiff::compute(
            "a.sh",
            Some((b"x\n", FileMode::Regular)),
            Some((b"x\n", FileMode::Executable)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        assert_eq!(diff.status, FileStatus::Modified);
        assert!(diff.hunks.is_empty());
    }

    #[test]
    fn added_file() {
        let diff = FileDiff::compute(
            "new.txt",
            None,
            Some((b"a\nb\n", FileMode::Regular)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        assert_eq!(diff.status, FileStatus::Added);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].old_start, 0);
        assert_eq!(diff.hunks[0].old_count, 0);
        assert_eq!(diff.hunks[0].new_start, 1);
        assert_eq!(diff.hunks[0].new_count, 2);
    }

    #[test]
    fn binary_content_produces_no_hunks() {
        let diff = FileDiff::compute(
            "blob.bin",
            Some((b"a\0b", FileMode::Regular)),
            Some((b"c\0d", FileMode::Regular)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        assert!(diff.is_binary);
        assert!(diff.hunks.is_empty());
    }
}
