use anyhow::{bail, Result};
use bstr::ByteSlice;
use clap::Args;
use minigit_index::IndexEntry;
use minigit_repository::RestoreSource;

use super::{open_repo, repo_paths};

#[derive(Args)]
pub struct RestoreArgs {
    /// Paths to restore
    paths: Vec<String>,

    /// Restore the index (unstage) instead of the worktree
    #[arg(long)]
    staged: bool,

    /// Restore from the given revision instead of the index
    #[arg(long, value_name = "rev")]
    source: Option<String>,
}

pub fn run(args: &RestoreArgs) -> Result<i32> {
    if args.paths.is_empty() {
        bail!("you must specify path(s) to restore");
    }

    let repo = open_repo()?;
    let paths = repo_paths(&repo, &args.paths)?;

    if args.staged {
        // Reset index entries to HEAD's tree.
        let head_files = repo.head_tree_files()?;
        let mut index = repo.index()?;
        for path in &paths {
            match head_files.get(path) {
                Some(leaf) => {
                    index.upsert(IndexEntry {
                        path: path.clone(),
                        oid: leaf.oid,
                        mode: leaf.mode,
                        stat: Default::default(),
                    });
                }
                None => {
                    index.remove(path.as_bstr());
                }
            }
        }
        repo.write_index(&index)?;
        return Ok(0);
    }

    let source = match &args.source {
        Some(rev) => RestoreSource::Commit(minigit_revwalk::resolve_commit(&repo, rev)?),
        None => RestoreSource::Index,
    };
    repo.restore_paths(source, &paths)?;
    Ok(0)
}
