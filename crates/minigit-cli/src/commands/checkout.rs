use anyhow::{bail, Result};
use clap::Args;
use minigit_ref::RefName;
use minigit_repository::RestoreSource;
use minigit_revwalk::resolve_commit;

use super::{open_repo, repo_paths, short_oid};

#[derive(Args)]
pub struct CheckoutArgs {
    /// Branch, revision, or (with paths) restore source
    target: Option<String>,

    /// Create a new branch at HEAD and switch to it
    #[arg(short = 'b', value_name = "branch")]
    new_branch: Option<String>,

    /// Paths to restore instead of switching branches
    #[arg(last = true)]
    paths: Vec<String>,
}

pub fn run(args: &CheckoutArgs) -> Result<i32> {
    let repo = open_repo()?;

    // `checkout -b <name>`: create at HEAD (or at <target>) and switch.
    if let Some(ref name) = args.new_branch {
        let branch = RefName::branch(name)?;
        if repo.refs().exists(&branch) {
            bail!("a branch named '{name}' already exists");
        }
        if let Some(ref start) = args.target {
            let start_oid = resolve_commit(&repo, start)?;
            repo.refs().write_ref(&branch, &start_oid)?;
            let tree = repo.read_commit(&start_oid)?.tree;
            repo.checkout_tree(&tree)?;
        } else {
            let head = repo.require_head()?;
            repo.refs().write_ref(&branch, &head)?;
        }
        repo.refs()
            .write_symbolic(&RefName::new("HEAD")?, &branch)?;
        println!("Switched to a new branch '{name}'");
        return Ok(0);
    }

    // `checkout [<rev>] -- <paths...>`: path restore, no HEAD change.
    if !args.paths.is_empty() {
        let paths = repo_paths(&repo, &args.paths)?;
        let source = match &args.target {
            Some(rev) => RestoreSource::Commit(resolve_commit(&repo, rev)?),
            None => RestoreSource::Index,
        };
        repo.restore_paths(source, &paths)?;
        return Ok(0);
    }

    let Some(ref target) = args.target else {
        bail!("expected a branch name or revision");
    };

    // Branch switch when the name is a branch; detached checkout otherwise.
    if let Ok(branch) = RefName::branch(target) {
        if let Some(tip) = repo.refs().resolve(&branch)? {
            let tree = repo.read_commit(&tip)?.tree;
            repo.checkout_tree(&tree)?;
            repo.refs()
                .write_symbolic(&RefName::new("HEAD")?, &branch)?;
            println!("Switched to branch '{target}'");
            return Ok(0);
        }
    }

    let oid = resolve_commit(&repo, target)?;
    let commit = repo.read_commit(&oid)?;
    repo.checkout_tree(&commit.tree)?;
    repo.refs().write_ref(&RefName::new("HEAD")?, &oid)?;
    println!(
        "HEAD is now at {} {}",
        short_oid(&oid),
        commit.summary()
    );
    Ok(0)
}
