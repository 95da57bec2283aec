//! Three-way line-level content merge.
//!
//! Computes the base→ours and base→theirs diffs, then walks the base
//! jointly: lines where both sides agree with the base pass through, a run
//! changed on one side takes that side, identical changes on both sides are
//! emitted once, and overlapping divergent runs become a conflict hunk.

use std::collections::HashMap;

use minigit_diff::algorithm::{diff_lines, split_lines, Edit, EditOp};

/// Labels for conflict markers.
#[derive(Debug, Clone, Copy)]
pub struct MergeLabels<'a> {
    pub ours: &'a str,
    pub theirs: &'a str,
}

impl Default for MergeLabels<'_> {
    fn default() -> Self {
        Self {
            ours: "ours",
            theirs: "theirs",
        }
    }
}

/// Outcome of a content merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMergeResult {
    Clean(Vec<u8>),
    Conflict(Vec<u8>),
}

impl ContentMergeResult {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean(_))
    }

    pub fn content(&self) -> &[u8] {
        match self {
            Self::Clean(c) | Self::Conflict(c) => c,
        }
    }

    pub fn into_content(self) -> Vec<u8> {
        match self {
            Self::Clean(c) | Self::Conflict(c) => c,
        }
    }
}

/// Perform a three-way content merge of `ours` and `theirs` against `base`.
pub fn merge_content(
    base: &[u8],
    ours: &[u8],
    theirs: &[u8],
    labels: &MergeLabels<'_>,
) -> ContentMergeResult {
    // Trivial resolutions need no line work.
    if ours == theirs {
        return ContentMergeResult::Clean(ours.to_vec());
    }
    if base == ours {
        return ContentMergeResult::Clean(theirs.to_vec());
    }
    if base == theirs {
        return ContentMergeResult::Clean(ours.to_vec());
    }

    let base_lines = split_lines(base);
    let ours_lines = split_lines(ours);
    let theirs_lines = split_lines(theirs);

    let match_ours = match_map(&diff_lines(base, ours));
    let match_theirs = match_map(&diff_lines(base, theirs));

    let mut out: Vec<u8> = Vec::new();
    let mut conflicted = false;

    let mut i = 0; // base cursor
    let mut o = 0; // ours cursor
    let mut t = 0; // theirs cursor

    loop {
        // Find the next sync point: a base line matched by both sides at or
        // past the current cursors (or the end of all three sequences).
        let mut i2 = i;
        let (o2, t2) = loop {
            if i2 >= base_lines.len() {
                break (ours_lines.len(), theirs_lines.len());
            }
            if let (Some(&oo), Some(&tt)) = (match_ours.get(&i2), match_theirs.get(&i2)) {
                if oo >= o && tt >= t {
                    break (oo, tt);
                }
            }
            i2 += 1;
        };

        let base_run = &base_lines[i..i2];
        let ours_run = &ours_lines[o..o2];
        let theirs_run = &theirs_lines[t..t2];

        if ours_run == theirs_run {
            // Identical on both sides (possibly identical divergence).
            emit(&mut out, ours_run);
        } else if base_run == ours_run {
            emit(&mut out, theirs_run);
        } else if base_run == theirs_run {
            emit(&mut out, ours_run);
        } else {
            conflicted = true;
            emit_conflict(&mut out, ours_run, theirs_run, labels);
        }

        i = i2;
        o = o2;
        t = t2;

        if i < base_lines.len() {
            // The sync line itself.
            emit(&mut out, &base_lines[i..i + 1]);
            i += 1;
            o += 1;
            t += 1;
        } else {
            break;
        }
    }

    if conflicted {
        ContentMergeResult::Conflict(out)
    } else {
        ContentMergeResult::Clean(out)
    }
}

/// Base line index → side line index, from the Equal edits of a diff.
fn match_map(edits: &[Edit]) -> HashMap<usize, usize> {
    edits
        .iter()
        .filter(|e| e.op == EditOp::Equal)
        .map(|e| (e.old_index, e.new_index))
        .collect()
}

fn emit(out: &mut Vec<u8>, lines: &[&[u8]]) {
    for line in lines {
        out.extend_from_slice(line);
        out.push(b'\n');
    }
}

/// Emit one conflict hunk, bit-exact:
/// `<<<<<<< <ours>\n … =======\n … >>>>>>> <theirs>\n`.
fn emit_conflict(
    out: &mut Vec<u8>,
    ours_run: &[&[u8]],
    theirs_run: &[&[u8]],
    labels: &MergeLabels<'_>,
) {
    out.extend_from_slice(b"<<<<<<< ");
    out.extend_from_slice(labels.ours.as_bytes());
    out.push(b'\n');
    emit(out, ours_run);
    out.extend_from_slice(b"=======\n");
    emit(out, theirs_run);
    out.extend_from_slice(b">>>>>>> ");
    out.extend_from_slice(labels.theirs.as_bytes());
    out.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> MergeLabels<'static> {
        MergeLabels {
            ours: "HEAD",
            theirs: "feature",
        }
    }

    #[test]
    fn unchanged_side_takes_the_other() {
        let base = b"line1\nline2\n";
        let ours = b"line1\nmodified\n";
        let result = merge_content(base, ours, base, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), ours);

        let result = merge_content(base, base, ours, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), ours);
    }

    #[test]
    fn same_change_on_both_sides() {
        let base = b"line1\noriginal\nline3\n";
        let both = b"line1\nsame\nline3\n";
        let result = merge_content(base, both, both, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), both);
    }

    #[test]
    fn non_overlapping_changes_combine() {
        let base = b"a\nb\nc\nd\ne\n";
        let ours = b"A\nb\nc\nd\ne\n";
        let theirs = b"a\nb\nc\nd\nE\n";
        let result = merge_content(base, ours, theirs, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), b"A\nb\nc\nd\nE\n");
    }

    #[test]
    fn prepend_and_append_combine() {
        let base = b"hello\n";
        let ours = b"hello\nM\n";
        let theirs = b"F\nhello\n";
        let result = merge_content(base, ours, theirs, &labels());
        assert!(result.is_clean(), "got: {:?}", String::from_utf8_lossy(result.content()));
        assert_eq!(result.content(), b"F\nhello\nM\n");
    }

    #[test]
    fn overlapping_divergence_conflicts() {
        let base = b"hello\n";
        let ours = b"X\n";
        let theirs = b"Y\n";
        let result = merge_content(base, ours, theirs, &labels());
        assert!(!result.is_clean());
        assert_eq!(
            result.content(),
            b"<<<<<<< HEAD\nX\n=======\nY\n>>>>>>> feature\n"
        );
    }

    #[test]
    fn conflict_between_context_lines() {
        let base = b"top\nmid\nbottom\n";
        let ours = b"top\nours says\nbottom\n";
        let theirs = b"top\ntheirs says\nbottom\n";
        let result = merge_content(base, ours, theirs, &labels());
        assert!(!result.is_clean());
        assert_eq!(
            result.content(),
            b"top\n<<<<<<< HEAD\nours says\n=======\ntheirs says\n>>>>>>> feature\nbottom\n"
                .as_slice()
        );
    }

    #[test]
    fn deletion_on_one_side_applies() {
        let base = b"a\nb\nc\n";
        let ours = b"a\nc\n";
        let result = merge_content(base, ours, base, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), ours);
    }

    #[test]
    fn add_add_against_empty_base_conflicts() {
        let result = merge_content(b"", b"ours line\n", b"theirs line\n", &labels());
        assert!(!result.is_clean());
        let text = String::from_utf8_lossy(result.content()).into_owned();
        assert!(text.contains("<<<<<<< HEAD\nours line\n"));
        assert!(text.contains("=======\ntheirs line\n"));
    }

    #[test]
    fn disjoint_edits_in_larger_file() {
        let base = b"1\n2\n3\n4\n5\n6\n7\n8\n";
        let ours = b"1\nTWO\n3\n4\n5\n6\n7\n8\n";
        let theirs = b"1\n2\n3\n4\n5\n6\nSEVEN\n8\n";
        let result = merge_content(base, ours, theirs, &labels());
        assert!(result.is_clean());
        assert_eq!(result.content(), b"1\nTWO\n3\n4\n5\n6\nSEVEN\n8\n");
    }
}
