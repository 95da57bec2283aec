//! The whole-repository merge operation.
//!
//! Detects already-up-to-date and fast-forward cases via ancestry, runs the
//! per-path three-way merge over the flattened base/ours/theirs trees,
//! applies results to the worktree and index, and maintains the merge-state
//! files (`MERGE_HEAD`, `MERGE_MSG`, `ORIG_HEAD`).

use std::collections::BTreeSet;

use bstr::{BString, ByteSlice};
use minigit_hash::ObjectId;
use minigit_object::{Commit, FileMode, Object, ObjectType};
use minigit_repository::{Identity, RepoError, Repository, TreeLeaf};
use minigit_revwalk::{is_ancestor, merge_base};

use crate::content::MergeLabels;
use crate::files::merge_files;
use crate::MergeError;

/// Options for the merge operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Stop before creating the merge commit, leaving `MERGE_HEAD` behind.
    pub no_commit: bool,
}

/// What the merge operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `theirs` was already reachable from `HEAD`.
    AlreadyUpToDate,
    /// `HEAD` was an ancestor of `theirs`; the ref moved forward.
    FastForward(ObjectId),
    /// A merge commit was created.
    Merged(ObjectId),
    /// The merge was applied but not committed (`--no-commit`).
    MergedNotCommitted,
    /// Conflicts were written to the worktree; the merge state is left in
    /// place for a later commit or abort.
    Conflicts(Vec<BString>),
}

/// Merge `theirs` (labelled `theirs_label` in conflict markers and the
/// default message) into `HEAD`.
pub fn merge_with_head(
    repo: &Repository,
    theirs: &ObjectId,
    theirs_label: &str,
    identity: &Identity,
    options: &MergeOptions,
) -> Result<MergeOutcome, MergeError> {
    let head = repo.head_oid()?.ok_or(MergeError::UnbornHead)?;
    let message = format!("Merge branch '{theirs_label}'\n");

    if *theirs == head || is_ancestor(repo, theirs, &head)? {
        return Ok(MergeOutcome::AlreadyUpToDate);
    }

    if is_ancestor(repo, &head, theirs)? {
        // Fast-forward: move the ref and reconcile the worktree.
        repo.write_orig_head(&head)?;
        let target_tree = repo.read_commit(theirs)?.tree;
        repo.checkout_tree(&target_tree)?;
        repo.update_head_commit(theirs)?;
        if options.no_commit {
            repo.write_merge_state(theirs, message.as_bytes())?;
        }
        return Ok(MergeOutcome::FastForward(*theirs));
    }

    let base = merge_base(repo, &head, theirs)?.ok_or(MergeError::NoMergeBase)?;

    let base_files = repo.commit_tree_files(&base)?;
    let ours_files = repo.commit_tree_files(&head)?;
    let theirs_files = repo.commit_tree_files(theirs)?;

    // Paths changed on either side relative to the base.
    let mut paths: BTreeSet<BString> = BTreeSet::new();
    for (map, other) in [(&ours_files, &base_files), (&theirs_files, &base_files)] {
        for (path, leaf) in map.iter() {
            if other.get(path).map(|l| l.oid) != Some(leaf.oid) {
                paths.insert(path.clone());
            }
        }
        for path in other.keys() {
            if !map.contains_key(path) {
                paths.insert(path.clone());
            }
        }
    }

    // Refuse to start when a path the merge will touch has local changes.
    let index = repo.index()?;
    for path in &paths {
        let ours_oid = ours_files.get(path).map(|l| l.oid);
        let theirs_oid = theirs_files.get(path).map(|l| l.oid);
        if ours_oid == theirs_oid {
            continue;
        }
        let index_oid = index.get(path.as_bstr()).map(|e| e.oid);
        if index_oid != ours_oid {
            return Err(MergeError::Repo(RepoError::LocalChangesWouldBeOverwritten(
                path.clone(),
            )));
        }
        if let Some((wt_oid, _)) = repo.hash_worktree_file(path.as_bstr())? {
            if Some(wt_oid) != index_oid {
                return Err(MergeError::Repo(RepoError::LocalChangesWouldBeOverwritten(
                    path.clone(),
                )));
            }
        }
    }

    repo.write_orig_head(&head)?;

    let labels = MergeLabels {
        ours: "HEAD",
        theirs: theirs_label,
    };

    let mut index = index;
    let mut conflicts: Vec<BString> = Vec::new();

    for path in &paths {
        let base_leaf = base_files.get(path);
        let ours_leaf = ours_files.get(path);
        let theirs_leaf = theirs_files.get(path);

        // Unchanged relative to ours: nothing to do.
        if leaf_oid(ours_leaf) == leaf_oid(theirs_leaf) {
            continue;
        }
        if leaf_oid(theirs_leaf) == leaf_oid(base_leaf) {
            continue;
        }

        let base_content = read_leaf(repo, base_leaf)?;
        let ours_content = read_leaf(repo, ours_leaf)?;
        let theirs_content = read_leaf(repo, theirs_leaf)?;

        let result = merge_files(
            base_content.as_deref(),
            ours_content.as_deref(),
            theirs_content.as_deref(),
            &labels,
        );

        let mode = ours_leaf
            .or(theirs_leaf)
            .map(|l| l.mode)
            .unwrap_or(FileMode::Regular);

        match result.content {
            Some(content) => {
                let blob = repo.odb().write_raw(ObjectType::Blob, &content)?;
                repo.write_worktree_file(path.as_bstr(), &blob, mode)?;
                index.upsert(repo.entry_from_worktree(path.as_bstr(), blob, mode));
            }
            None => {
                repo.remove_worktree_file(path.as_bstr())?;
                index.remove(path.as_bstr());
            }
        }

        if result.conflict {
            conflicts.push(path.clone());
        }
    }

    repo.write_index(&index)?;

    if !conflicts.is_empty() {
        repo.write_merge_state(theirs, merge_msg_with_conflicts(&message, &conflicts).as_slice())?;
        return Ok(MergeOutcome::Conflicts(conflicts));
    }

    if options.no_commit {
        repo.write_merge_state(theirs, message.as_bytes())?;
        return Ok(MergeOutcome::MergedNotCommitted);
    }

    let tree = index.write_tree(repo.odb())?;
    let commit = Commit {
        tree,
        parents: vec![head, *theirs],
        author: identity.author.clone(),
        committer: identity.committer.clone(),
        message: BString::from(message),
    };
    let merge_oid = repo.odb().write(&Object::Commit(commit))?;
    repo.update_head_commit(&merge_oid)?;
    repo.clear_merge_state()?;

    Ok(MergeOutcome::Merged(merge_oid))
}

/// Abort an in-progress merge: reset the worktree and index to `ORIG_HEAD`
/// and clear the merge state.
pub fn abort_merge(repo: &Repository) -> Result<(), MergeError> {
    if !repo.merge_in_progress() {
        return Err(MergeError::NothingToAbort);
    }
    let orig = repo.orig_head()?.ok_or(MergeError::NothingToAbort)?;
    let tree = repo.read_commit(&orig)?.tree;
    repo.checkout_tree(&tree)?;
    repo.update_head_commit(&orig)?;
    repo.clear_merge_state()?;
    Ok(())
}

fn leaf_oid(leaf: Option<&TreeLeaf>) -> Option<ObjectId> {
    leaf.map(|l| l.oid)
}

fn read_leaf(repo: &Repository, leaf: Option<&TreeLeaf>) -> Result<Option<Vec<u8>>, MergeError> {
    match leaf {
        Some(leaf) => {
            let (_, body) = repo.odb().read(&leaf.oid)?;
            Ok(Some(body))
        }
        None => Ok(None),
    }
}

/// The proposed commit message for a conflicted merge lists the conflicted
/// paths as comments, the way the eventual commit template shows them.
fn merge_msg_with_conflicts(message: &str, conflicts: &[BString]) -> BString {
    let mut out = BString::from(message);
    out.extend_from_slice(b"\n# Conflicts:\n");
    for path in conflicts {
        out.extend_from_slice(b"#\t");
        out.extend_from_slice(path);
        out.push(b'\n');
    }
    out
}
