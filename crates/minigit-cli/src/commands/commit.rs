use anyhow::{bail, Result};
use bstr::{BString, ByteSlice};
use clap::Args;
use minigit_hash::ObjectId;
use minigit_object::{Commit, Object};
use minigit_repository::{Identity, Repository};

use super::{open_repo, short_oid};

#[derive(Args)]
pub struct CommitArgs {
    /// Use the given message as the commit message (repeatable; paragraphs)
    #[arg(short = 'm', num_args = 1)]
    message: Vec<String>,

    /// Automatically stage modified and deleted tracked files
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Replace the tip of the current branch with a new commit
    #[arg(long)]
    amend: bool,

    /// Allow a commit whose tree equals its parent's
    #[arg(long)]
    allow_empty: bool,
}

pub fn run(args: &CommitArgs) -> Result<i32> {
    let repo = open_repo()?;

    if args.all {
        auto_stage_tracked(&repo)?;
    }

    let index = repo.index()?;
    let merging = repo.merge_head()?;

    if index.is_empty() && !args.amend {
        bail!("nothing to commit (create/copy files and use \"minigit add\" to track)");
    }

    let tree_oid = index.write_tree(repo.odb())?;

    // Parents and the previous commit (for amend).
    let head = repo.head_oid()?;
    let mut prev_commit: Option<Commit> = None;
    let parents: Vec<ObjectId> = if args.amend {
        let head = head.ok_or_else(|| anyhow::anyhow!("cannot amend: no existing commit"))?;
        let commit = repo.read_commit(&head)?;
        let parents = commit.parents.clone();
        prev_commit = Some(commit);
        parents
    } else {
        let mut parents: Vec<ObjectId> = head.into_iter().collect();
        if let Some(merge_head) = merging {
            parents.push(merge_head);
        }
        parents
    };

    // An unchanged tree is only allowed with --amend, --allow-empty, or a
    // merge conclusion.
    if !args.amend && !args.allow_empty && merging.is_none() {
        if let Some(head_tree) = repo.head_tree_oid()? {
            if head_tree == tree_oid {
                bail!("nothing to commit, working tree clean");
            }
        }
    }

    let message = determine_message(args, &repo, prev_commit.as_ref())?;
    if message.trim().is_empty() {
        bail!("aborting commit due to empty commit message");
    }

    let identity = Identity::from_env();
    let author = match (&prev_commit, args.amend) {
        // Amending reuses the original author.
        (Some(prev), true) => prev.author.clone(),
        _ => identity.author.clone(),
    };

    let commit = Commit {
        tree: tree_oid,
        parents,
        author,
        committer: identity.committer,
        message,
    };
    let is_root = commit.is_root();
    let summary = commit.summary().to_string();

    let commit_oid = repo.odb().write(&Object::Commit(commit))?;
    repo.update_head_commit(&commit_oid)?;

    if merging.is_some() {
        repo.clear_merge_state()?;
    }

    let branch = repo
        .refs()
        .current_branch()?
        .unwrap_or_else(|| "detached HEAD".to_string());
    if is_root {
        println!("[{branch} (root-commit) {}] {summary}", short_oid(&commit_oid));
    } else {
        println!("[{branch} {}] {summary}", short_oid(&commit_oid));
    }

    Ok(0)
}

/// Stage modified and deleted tracked files (the `-a` flag).
fn auto_stage_tracked(repo: &Repository) -> Result<()> {
    let mut index = repo.index()?;
    repo.stage_all(&mut index, true)?;

    // Deletions of tracked files are staged too.
    let vanished: Vec<BString> = index
        .iter()
        .filter(|e| std::fs::symlink_metadata(repo.worktree_file(e.path.as_bstr())).is_err())
        .map(|e| e.path.clone())
        .collect();
    for path in vanished {
        index.remove(path.as_bstr());
    }

    repo.write_index(&index)?;
    Ok(())
}

/// Assemble the commit message from `-m` flags, `MERGE_MSG`, or the amended
/// commit.
fn determine_message(
    args: &CommitArgs,
    repo: &Repository,
    prev_commit: Option<&Commit>,
) -> Result<BString> {
    if !args.message.is_empty() {
        let mut joined = args.message.join("\n\n");
        if !joined.ends_with('\n') {
            joined.push('\n');
        }
        return Ok(BString::from(joined));
    }

    if repo.merge_in_progress() {
        if let Some(msg) = repo.merge_msg()? {
            // Strip comment lines from the proposed message.
            let mut out = BString::from("");
            for line in msg.lines_with_terminator() {
                if !line.starts_with(b"#") {
                    out.extend_from_slice(line);
                }
            }
            return Ok(out);
        }
    }

    if args.amend {
        if let Some(prev) = prev_commit {
            return Ok(prev.message.clone());
        }
    }

    bail!("no commit message given (use -m)");
}
