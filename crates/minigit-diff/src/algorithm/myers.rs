//! Myers O((N+M)·D) difference algorithm with V-array and trace
//! backtracking, as described in "An O(ND) Difference Algorithm and Its
//! Variations" (1986).

use super::{line_hash, Edit, EditOp};

/// Compute the edit script between two line sequences.
pub fn diff(old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
    if old.is_empty() && new.is_empty() {
        return Vec::new();
    }

    let old_hashes: Vec<u64> = old.iter().map(|l| line_hash(l)).collect();
    let new_hashes: Vec<u64> = new.iter().map(|l| line_hash(l)).collect();

    // Trim the common prefix.
    let mut prefix = 0;
    while prefix < old.len()
        && prefix < new.len()
        && old_hashes[prefix] == new_hashes[prefix]
        && old[prefix] == new[prefix]
    {
        prefix += 1;
    }

    // Trim the common suffix.
    let mut suffix = 0;
    while suffix < old.len() - prefix
        && suffix < new.len() - prefix
        && old_hashes[old.len() - 1 - suffix] == new_hashes[new.len() - 1 - suffix]
        && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];
    let old_mid_h = &old_hashes[prefix..old.len() - suffix];
    let new_mid_h = &new_hashes[prefix..new.len() - suffix];

    let mut edits = Vec::with_capacity(old.len() + new.len());
    for i in 0..prefix {
        edits.push(Edit {
            op: EditOp::Equal,
            old_index: i,
            new_index: i,
        });
    }

    for edit in myers_inner(old_mid, new_mid, old_mid_h, new_mid_h) {
        edits.push(Edit {
            op: edit.op,
            old_index: edit.old_index + prefix,
            new_index: edit.new_index + prefix,
        });
    }

    for i in 0..suffix {
        edits.push(Edit {
            op: EditOp::Equal,
            old_index: old.len() - suffix + i,
            new_index: new.len() - suffix + i,
        });
    }

    edits
}

/// Forward search recording the V array at each depth, then backtrack.
fn myers_inner(old: &[&[u8]], new: &[&[u8]], old_h: &[u64], new_h: &[u64]) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();

    if n == 0 {
        return (0..m)
            .map(|j| Edit {
                op: EditOp::Insert,
                old_index: 0,
                new_index: j,
            })
            .collect();
    }
    if m == 0 {
        return (0..n)
            .map(|i| Edit {
                op: EditOp::Delete,
                old_index: i,
                new_index: 0,
            })
            .collect();
    }

    let max = n + m;
    let offset = max as isize;
    let mut v = vec![0usize; 2 * max + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();

    'outer: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize])
            {
                v[(k + 1 + offset) as usize]
            } else {
                v[(k - 1 + offset) as usize] + 1
            };
            let mut y = (x as isize - k) as usize;

            while x < n && y < m && old_h[x] == new_h[y] && old[x] == new[y] {
                x += 1;
                y += 1;
            }

            v[(k + offset) as usize] = x;

            if x >= n && y >= m {
                break 'outer;
            }
            k += 2;
        }
    }

    backtrack(&trace, n, m, offset)
}

/// Walk the trace backwards from (n, m), emitting edits in reverse.
fn backtrack(trace: &[Vec<usize>], n: usize, m: usize, offset: isize) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut x = n as isize;
    let mut y = m as isize;

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;

        let prev_k = if k == -d
            || (k != d && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize])
        {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize] as isize;
        let prev_y = prev_x - prev_k;

        // Unwind the diagonal (equal lines).
        while x > prev_x && y > prev_y {
            edits.push(Edit {
                op: EditOp::Equal,
                old_index: (x - 1) as usize,
                new_index: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }

        // The single non-diagonal step that entered this depth.
        if d > 0 {
            if x == prev_x {
                edits.push(Edit {
                    op: EditOp::Insert,
                    old_index: prev_x as usize,
                    new_index: prev_y as usize,
                });
            } else {
                edits.push(Edit {
                    op: EditOp::Delete,
                    old_index: prev_x as usize,
                    new_index: prev_y as usize,
                });
            }
        }

        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}
