use anyhow::{bail, Result};
use clap::Args;
use minigit_ref::RefName;
use minigit_revwalk::{is_ancestor, resolve_commit};

use super::open_repo;

#[derive(Args)]
pub struct BranchArgs {
    /// Branch name (and optional start point / rename target)
    names: Vec<String>,

    /// Delete a branch that has been merged into HEAD
    #[arg(short = 'd')]
    delete: bool,

    /// Delete a branch regardless of its merged status
    #[arg(short = 'D')]
    force_delete: bool,

    /// Rename a branch (defaults to renaming the current branch)
    #[arg(short = 'm')]
    rename: bool,
}

pub fn run(args: &BranchArgs) -> Result<i32> {
    let repo = open_repo()?;

    if args.delete || args.force_delete {
        return delete(&repo, args);
    }
    if args.rename {
        return rename(&repo, args);
    }

    match args.names.len() {
        0 => list(&repo),
        1 | 2 => create(&repo, args),
        _ => bail!("too many arguments"),
    }
}

fn list(repo: &minigit_repository::Repository) -> Result<i32> {
    let current = repo.refs().current_branch()?;
    for name in repo.refs().list("refs/heads")? {
        let short = name.short_name().to_string();
        if Some(&short) == current.as_ref() {
            println!("* {short}");
        } else {
            println!("  {short}");
        }
    }
    Ok(0)
}

fn create(repo: &minigit_repository::Repository, args: &BranchArgs) -> Result<i32> {
    let name = &args.names[0];
    let target = match args.names.get(1) {
        Some(rev) => resolve_commit(repo, rev)?,
        None => repo.require_head()?,
    };

    let branch = RefName::branch(name)?;
    if repo.refs().exists(&branch) {
        bail!("a branch named '{name}' already exists");
    }
    repo.refs().write_ref(&branch, &target)?;
    Ok(0)
}

fn delete(repo: &minigit_repository::Repository, args: &BranchArgs) -> Result<i32> {
    if args.names.is_empty() {
        bail!("branch name required");
    }

    for name in &args.names {
        let branch = RefName::branch(name)?;
        let Some(tip) = repo.refs().resolve(&branch)? else {
            bail!("branch '{name}' not found");
        };

        if repo.refs().current_branch()?.as_deref() == Some(name.as_str()) {
            bail!("cannot delete the currently checked out branch '{name}'");
        }

        if !args.force_delete {
            let head = repo.require_head()?;
            if !is_ancestor(repo, &tip, &head)? {
                bail!("the branch '{name}' is not fully merged (use -D to force)");
            }
        }

        repo.refs().delete_ref(&branch)?;
        println!("Deleted branch {name}");
    }
    Ok(0)
}

fn rename(repo: &minigit_repository::Repository, args: &BranchArgs) -> Result<i32> {
    let (old_short, new_short) = match args.names.len() {
        1 => {
            let current = repo
                .refs()
                .current_branch()?
                .ok_or_else(|| anyhow::anyhow!("cannot rename: HEAD is detached"))?;
            (current, args.names[0].clone())
        }
        2 => (args.names[0].clone(), args.names[1].clone()),
        _ => bail!("usage: branch -m [<old>] <new>"),
    };

    let old_ref = RefName::branch(&old_short)?;
    let new_ref = RefName::branch(&new_short)?;

    if repo.refs().exists(&new_ref) {
        bail!("a branch named '{new_short}' already exists");
    }
    let Some(tip) = repo.refs().resolve(&old_ref)? else {
        bail!("branch '{old_short}' not found");
    };

    repo.refs().write_ref(&new_ref, &tip)?;

    // Re-point HEAD when the renamed branch is checked out.
    if repo.refs().current_branch()?.as_deref() == Some(old_short.as_str()) {
        repo.refs()
            .write_symbolic(&RefName::new("HEAD")?, &new_ref)?;
    }

    repo.refs().delete_ref(&old_ref)?;
    Ok(0)
}
