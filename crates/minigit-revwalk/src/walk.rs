//! Commit traversal for log output: newest-first by committer date, across
//! all parents, with a visited set.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use minigit_hash::ObjectId;
use minigit_repository::Repository;

use crate::RevWalkError;

struct WalkEntry {
    oid: ObjectId,
    /// Committer timestamp, seconds since epoch.
    date: i64,
    /// Insertion counter for stable ordering within one date.
    ctr: u64,
}

impl PartialEq for WalkEntry {
    fn eq(&self, other: &Self) -> bool {
        self.oid == other.oid
    }
}

impl Eq for WalkEntry {}

impl PartialOrd for WalkEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WalkEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: newest date first; earlier insertion wins ties.
        self.date
            .cmp(&other.date)
            .then(other.ctr.cmp(&self.ctr))
    }
}

/// Iterator over commit OIDs reachable from the pushed starting points.
pub struct RevWalk<'a> {
    repo: &'a Repository,
    queue: BinaryHeap<WalkEntry>,
    seen: HashSet<ObjectId>,
    ctr: u64,
}

impl<'a> RevWalk<'a> {
    /// Create a walker with no starting points.
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            repo,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            ctr: 0,
        }
    }

    /// Add a starting commit.
    pub fn push(&mut self, oid: ObjectId) -> Result<(), RevWalkError> {
        if !self.seen.insert(oid) {
            return Ok(());
        }
        let commit = self.repo.read_commit(&oid)?;
        self.enqueue(oid, commit.committer.date.timestamp);
        Ok(())
    }

    fn enqueue(&mut self, oid: ObjectId, date: i64) {
        self.queue.push(WalkEntry {
            oid,
            date,
            ctr: self.ctr,
        });
        self.ctr += 1;
    }
}

impl Iterator for RevWalk<'_> {
    type Item = Result<ObjectId, RevWalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.queue.pop()?;
        let commit = match self.repo.read_commit(&entry.oid) {
            Ok(c) => c,
            Err(e) => return Some(Err(e.into())),
        };
        for parent in commit.parents {
            if self.seen.insert(parent) {
                match self.repo.read_commit(&parent) {
                    Ok(pc) => self.enqueue(parent, pc.committer.date.timestamp),
                    Err(e) => return Some(Err(e.into())),
                }
            }
        }
        Some(Ok(entry.oid))
    }
}
