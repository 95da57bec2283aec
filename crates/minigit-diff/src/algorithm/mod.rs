//! Line splitting, the edit-script model, and hunk assembly.

pub mod myers;

use bstr::BString;

use crate::{DiffLine, Hunk};

/// An edit operation in the edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Line present in both old and new.
    Equal,
    /// Line inserted (present only in new).
    Insert,
    /// Line deleted (present only in old).
    Delete,
}

/// A single edit, referencing lines by index.
///
/// For `Equal` both indices are meaningful; for `Delete` the `new_index` is
/// the current position in the new sequence (and vice versa for `Insert`),
/// which makes hunk starts computable for zero-count sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub op: EditOp,
    pub old_index: usize,
    pub new_index: usize,
}

/// Split content into lines: split on `\n` and discard a final empty
/// element when the input ends with `\n`. Lines carry no terminator.
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
    if data.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Compute the line-level edit script from `old` to `new`.
pub fn diff_lines(old: &[u8], new: &[u8]) -> Vec<Edit> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    myers::diff(&old_lines, &new_lines)
}

/// Compute the diff and assemble hunks with `context` surrounding lines.
pub fn diff_hunks(old: &[u8], new: &[u8], context: usize) -> Vec<Hunk> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let edits = myers::diff(&old_lines, &new_lines);
    edits_to_hunks(&edits, &old_lines, &new_lines, context)
}

/// Group non-equal edits into hunks: up to `context` equal lines on each
/// side, merging adjacent groups whose gap is at most `2 * context`.
pub fn edits_to_hunks(
    edits: &[Edit],
    old_lines: &[&[u8]],
    new_lines: &[&[u8]],
    context: usize,
) -> Vec<Hunk> {
    // Locate maximal runs of non-equal edits.
    let mut change_ranges: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < edits.len() {
        if edits[i].op == EditOp::Equal {
            i += 1;
            continue;
        }
        let start = i;
        while i < edits.len() && edits[i].op != EditOp::Equal {
            i += 1;
        }
        change_ranges.push((start, i));
    }

    if change_ranges.is_empty() {
        return Vec::new();
    }

    // Merge ranges separated by at most 2*context equal lines.
    let mut merged: Vec<(usize, usize)> = Vec::new();
    let mut current = change_ranges[0];
    for &(start, end) in &change_ranges[1..] {
        if start - current.1 <= 2 * context {
            current.1 = end;
        } else {
            merged.push(current);
            current = (start, end);
        }
    }
    merged.push(current);

    // Expand each range by the context window and emit hunks.
    let mut hunks = Vec::new();
    for (change_start, change_end) in merged {
        let hunk_start = change_start.saturating_sub(context);
        let hunk_end = (change_end + context).min(edits.len());

        let mut lines = Vec::with_capacity(hunk_end - hunk_start);
        let mut old_count = 0u32;
        let mut new_count = 0u32;
        for edit in &edits[hunk_start..hunk_end] {
            match edit.op {
                EditOp::Equal => {
                    lines.push(DiffLine::Context(BString::from(old_lines[edit.old_index])));
                    old_count += 1;
                    new_count += 1;
                }
                EditOp::Delete => {
                    lines.push(DiffLine::Deletion(BString::from(old_lines[edit.old_index])));
                    old_count += 1;
                }
                EditOp::Insert => {
                    lines.push(DiffLine::Addition(BString::from(new_lines[edit.new_index])));
                    new_count += 1;
                }
            }
        }

        let first = &edits[hunk_start];
        // A side with no lines reports the line *before* the hunk (git's
        // "-N,0" convention); otherwise the 1-based first included line.
        let old_start = if old_count == 0 {
            first.old_index as u32
        } else {
            first.old_index as u32 + 1
        };
        let new_start = if new_count == 0 {
            first.new_index as u32
        } else {
            first.new_index as u32 + 1
        };

        hunks.push(Hunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
        });
    }

    hunks
}

/// DJB2a line hash for cheap pre-comparison.
pub(crate) fn line_hash(line: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in line {
        hash = hash.wrapping_mul(33) ^ (b as u64);
    }
    hash
}
