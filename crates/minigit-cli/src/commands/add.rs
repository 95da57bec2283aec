use anyhow::{bail, Result};
use bstr::ByteSlice;
use clap::Args;

use super::{open_repo, repo_paths};

#[derive(Args)]
pub struct AddArgs {
    /// Files to add
    pathspecs: Vec<String>,

    /// Stage all changes in the worktree (additions, modifications, removals)
    #[arg(short = 'A', long = "all")]
    all: bool,

    /// Only refresh files already tracked in the index
    #[arg(short = 'u', long = "update")]
    update: bool,
}

pub fn run(args: &AddArgs) -> Result<i32> {
    let repo = open_repo()?;
    let mut index = repo.index()?;

    if args.all || args.update {
        repo.stage_all(&mut index, args.update)?;
    } else {
        if args.pathspecs.is_empty() {
            bail!("nothing specified, nothing added");
        }
        let paths = repo_paths(&repo, &args.pathspecs)?;
        for path in &paths {
            // A directory pathspec stages everything under it.
            if repo.worktree_file(path.as_bstr()).is_dir() {
                let mut dir_prefix = path.clone();
                dir_prefix.push(b'/');
                for file in repo.scan_worktree()? {
                    if file.starts_with(dir_prefix.as_slice()) {
                        repo.stage_path(&mut index, file.as_bstr())?;
                    }
                }
            } else {
                repo.stage_path(&mut index, path.as_bstr())?;
            }
        }
    }

    repo.write_index(&index)?;
    Ok(0)
}
