//! Unified diff output.
//!
//! `diff --git` headers, optional mode lines, `---`/`+++` with `/dev/null`
//! on absent sides, and `@@ -oldStart,oldCount +newStart,newCount @@`
//! hunk headers.

use bstr::{BString, ByteSlice, ByteVec};

use crate::{DiffLine, FileDiff, FileStatus};

/// Format a list of file diffs as one unified-diff document.
pub fn format(files: &[FileDiff]) -> BString {
    let mut out = BString::new(Vec::new());
    for file in files {
        format_file(&mut out, file);
    }
    out
}

/// Format a single file's diff.
pub fn format_file(out: &mut BString, file: &FileDiff) {
    let path = file.path.to_str_lossy();

    out.push_str(format!("diff --git a/{path} b/{path}\n"));

    match file.status {
        FileStatus::Added => {
            if let Some(mode) = file.new_mode {
                out.push_str(format!("new file mode {:06o}\n", mode.raw()));
            }
        }
        FileStatus::Deleted => {
            if let Some(mode) = file.old_mode {
                out.push_str(format!("deleted file mode {:06o}\n", mode.raw()));
            }
        }
        FileStatus::Modified => {
            if let (Some(old_mode), Some(new_mode)) = (file.old_mode, file.new_mode) {
                if old_mode != new_mode {
                    out.push_str(format!("old mode {:06o}\n", old_mode.raw()));
                    out.push_str(format!("new mode {:06o}\n", new_mode.raw()));
                }
            }
        }
    }

    if file.is_binary {
        let a = match file.status {
            FileStatus::Added => "/dev/null".to_string(),
            _ => format!("a/{path}"),
        };
        let b = match file.status {
            FileStatus::Deleted => "/dev/null".to_string(),
            _ => format!("b/{path}"),
        };
        out.push_str(format!("Binary files {a} and {b} differ\n"));
        return;
    }

    if file.hunks.is_empty() {
        return;
    }

    if file.status == FileStatus::Added {
        out.push_str("--- /dev/null\n");
    } else {
        out.push_str(format!("--- a/{path}\n"));
    }
    if file.status == FileStatus::Deleted {
        out.push_str("+++ /dev/null\n");
    } else {
        out.push_str(format!("+++ b/{path}\n"));
    }

    for hunk in &file.hunks {
        out.push_str(format!(
            "@@ -{},{} +{},{} @@\n",
            hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
        ));
        for line in &hunk.lines {
            let (prefix, content) = match line {
                DiffLine::Context(c) => (b' ', c),
                DiffLine::Addition(c) => (b'+', c),
                DiffLine::Deletion(c) => (b'-', c),
            };
            out.push(prefix);
            out.push_str(content.as_slice());
            out.push(b'\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_CONTEXT;
    use minigit_object::FileMode;

    #[test]
    fn modified_file_layout() {
        let diff = FileDiff::compute(
            "a.txt",
            Some((b"one\ntwo\nthree\n", FileMode::Regular)),
            Some((b"one\n2\nthree\n", FileMode::Regular)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        let text = format(&[diff]).to_string();
        assert_eq!(
            text,
            "diff --git a/a.txt b/a.txt\n\
             --- a/a.txt\n\
             +++ b/a.txt\n\
             @@ -1,3 +1,3 @@\n\
              one\n\
             -two\n\
             +2\n\
              three\n"
        );
    }

    #[test]
    fn new_file_layout() {
        let diff = FileDiff::compute(
            "new.txt",
            None,
            Some((b"hi\n", FileMode::Regular)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        let text = format(&[diff]).to_string();
        assert_eq!(
            text,
            "diff --git a/new.txt b/new.txt\n\
             new file mode 100644\n\
             --- /dev/null\n\
             +++ b/new.txt\n\
             @@ -0,0 +1,1 @@\n\
             +hi\n"
        );
    }

    #[test]
    fn deleted_file_layout() {
        let diff = FileDiff::compute(
            "gone.txt",
            Some((b"bye\n", FileMode::Regular)),
            None,
            DEFAULT_CONTEXT,
        )
        .unwrap();
        let text = format(&[diff]).to_string();
        assert_eq!(
            text,
            "diff --git a/gone.txt b/gone.txt\n\
             deleted file mode 100644\n\
             --- a/gone.txt\n\
             +++ /dev/null\n\
             @@ -1,1 +0,0 @@\n\
             -bye\n"
        );
    }

    #[test]
    fn mode_change_lines() {
        let diff = FileDiff::compute(
            "run.sh",
            Some((b"x\n", FileMode::Regular)),
            Some((b"x\n", FileMode::Executable)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        let text = format(&[diff]).to_string();
        assert!(text.contains("old mode 100644\n"));
        assert!(text.contains("new mode 100755\n"));
        // Same content: no --- / +++ and no hunks.
        assert!(!text.contains("--- "));
    }

    #[test]
    fn binary_notice() {
        let diff = FileDiff::compute(
            "blob.bin",
            Some((b"\x00\x01", FileMode::Regular)),
            Some((b"\x00\x02", FileMode::Regular)),
            DEFAULT_CONTEXT,
        )
        .unwrap();
        let text = format(&[diff]).to_string();
        assert!(text.contains("Binary files a/blob.bin and b/blob.bin differ\n"));
        assert!(!text.contains("@@"));
    }
}
