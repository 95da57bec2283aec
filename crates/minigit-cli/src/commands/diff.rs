use std::io::{self, Write};

use anyhow::{bail, Result};
use bstr::{BString, ByteSlice};
use clap::Args;
use minigit_diff::{unified, FileDiff, DEFAULT_CONTEXT};
use minigit_object::FileMode;
use minigit_repository::Repository;
use minigit_revwalk::resolve_commit;

use super::open_repo;

#[derive(Args)]
pub struct DiffArgs {
    /// Compare HEAD with the index instead of the index with the worktree
    #[arg(long)]
    cached: bool,

    /// Zero revisions (index vs worktree) or two revisions (tree vs tree)
    revs: Vec<String>,
}

pub fn run(args: &DiffArgs) -> Result<i32> {
    let repo = open_repo()?;

    let files = match (args.cached, args.revs.len()) {
        (true, 0) => diff_head_to_index(&repo)?,
        (false, 0) => diff_index_to_worktree(&repo)?,
        (false, 2) => diff_commits(&repo, &args.revs[0], &args.revs[1])?,
        _ => bail!("expected no revisions or exactly two"),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(unified::format(&files).as_slice())?;
    Ok(0)
}

/// One side of a file comparison: content plus mode.
type Side = Option<(Vec<u8>, FileMode)>;

fn push_diff(files: &mut Vec<FileDiff>, path: &BString, old: Side, new: Side) {
    let old_ref = old.as_ref().map(|(c, m)| (c.as_slice(), *m));
    let new_ref = new.as_ref().map(|(c, m)| (c.as_slice(), *m));
    if let Some(diff) = FileDiff::compute(path.clone(), old_ref, new_ref, DEFAULT_CONTEXT) {
        files.push(diff);
    }
}

fn diff_head_to_index(repo: &Repository) -> Result<Vec<FileDiff>> {
    let head = repo.head_tree_files()?;
    let index = repo.index()?;

    let mut files = Vec::new();
    for entry in index.iter() {
        let old = match head.get(&entry.path) {
            Some(leaf) => Some((repo.odb().read(&leaf.oid)?.1, leaf.mode)),
            None => None,
        };
        let new = Some((repo.odb().read(&entry.oid)?.1, entry.mode));
        push_diff(&mut files, &entry.path, old, new);
    }
    for (path, leaf) in &head {
        if index.get(path.as_bstr()).is_none() {
            let old = Some((repo.odb().read(&leaf.oid)?.1, leaf.mode));
            push_diff(&mut files, path, old, None);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn diff_index_to_worktree(repo: &Repository) -> Result<Vec<FileDiff>> {
    let index = repo.index()?;

    let mut files = Vec::new();
    for entry in index.iter() {
        let old = Some((repo.odb().read(&entry.oid)?.1, entry.mode));
        let new = match repo.hash_worktree_file(entry.path.as_bstr())? {
            Some((_, mode)) => {
                let full = repo.worktree_file(entry.path.as_bstr());
                let content = if mode.is_symlink() {
                    std::fs::read_link(&full)?
                        .to_string_lossy()
                        .into_owned()
                        .into_bytes()
                } else {
                    std::fs::read(&full)?
                };
                Some((content, mode))
            }
            None => None,
        };
        push_diff(&mut files, &entry.path, old, new);
    }

    Ok(files)
}

fn diff_commits(repo: &Repository, old_rev: &str, new_rev: &str) -> Result<Vec<FileDiff>> {
    let old_files = repo.commit_tree_files(&resolve_commit(repo, old_rev)?)?;
    let new_files = repo.commit_tree_files(&resolve_commit(repo, new_rev)?)?;

    let mut paths: Vec<&BString> = old_files.keys().chain(new_files.keys()).collect();
    paths.sort();
    paths.dedup();

    let mut files = Vec::new();
    for path in paths {
        let old = match old_files.get(path) {
            Some(leaf) => Some((repo.odb().read(&leaf.oid)?.1, leaf.mode)),
            None => None,
        };
        let new = match new_files.get(path) {
            Some(leaf) => Some((repo.odb().read(&leaf.oid)?.1, leaf.mode)),
            None => None,
        };
        push_diff(&mut files, path, old, new);
    }

    Ok(files)
}
