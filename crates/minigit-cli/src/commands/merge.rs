use anyhow::{bail, Result};
use clap::Args;
use minigit_merge::{abort_merge, merge_with_head, MergeOptions, MergeOutcome};
use minigit_repository::Identity;
use minigit_revwalk::resolve_commit;

use super::{open_repo, short_oid};

#[derive(Args)]
pub struct MergeArgs {
    /// Revision to merge into HEAD
    rev: Option<String>,

    /// Apply the merge but stop before committing
    #[arg(long)]
    no_commit: bool,

    /// Abort the in-progress merge and restore the pre-merge state
    #[arg(long)]
    abort: bool,
}

pub fn run(args: &MergeArgs) -> Result<i32> {
    let repo = open_repo()?;

    if args.abort {
        abort_merge(&repo)?;
        println!("Merge aborted.");
        return Ok(0);
    }

    let Some(ref rev) = args.rev else {
        bail!("expected a revision to merge");
    };

    if repo.merge_in_progress() {
        bail!("you have not concluded your merge (MERGE_HEAD exists)");
    }

    let theirs = resolve_commit(&repo, rev)?;
    let identity = Identity::from_env();
    let options = MergeOptions {
        no_commit: args.no_commit,
    };

    match merge_with_head(&repo, &theirs, rev, &identity, &options)? {
        MergeOutcome::AlreadyUpToDate => {
            println!("Already up to date.");
            Ok(0)
        }
        MergeOutcome::FastForward(oid) => {
            println!("Fast-forward to {}", short_oid(&oid));
            Ok(0)
        }
        MergeOutcome::Merged(oid) => {
            println!("Merge made by the three-way strategy ({}).", short_oid(&oid));
            Ok(0)
        }
        MergeOutcome::MergedNotCommitted => {
            println!("Automatic merge went well; stopped before committing as requested");
            Ok(0)
        }
        MergeOutcome::Conflicts(paths) => {
            for path in &paths {
                println!("CONFLICT (content): Merge conflict in {path}");
            }
            println!("Automatic merge failed; fix conflicts and then commit the result.");
            Ok(1)
        }
    }
}
