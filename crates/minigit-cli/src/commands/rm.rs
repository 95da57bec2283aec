use anyhow::{bail, Result};
use bstr::ByteSlice;
use clap::Args;

use super::{open_repo, repo_paths};

#[derive(Args)]
pub struct RmArgs {
    /// Files to remove
    paths: Vec<String>,

    /// Only remove from the index, keeping the worktree file
    #[arg(long)]
    cached: bool,
}

pub fn run(args: &RmArgs) -> Result<i32> {
    if args.paths.is_empty() {
        bail!("no paths given");
    }

    let repo = open_repo()?;
    let mut index = repo.index()?;
    let paths = repo_paths(&repo, &args.paths)?;

    for path in &paths {
        if !index.remove(path.as_bstr()) {
            bail!("pathspec '{path}' did not match any tracked files");
        }
    }
    repo.write_index(&index)?;

    if !args.cached {
        for path in &paths {
            repo.remove_worktree_file(path.as_bstr())?;
        }
    }

    for path in &paths {
        println!("rm '{path}'");
    }
    Ok(0)
}
