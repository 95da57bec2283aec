use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::{open_repo, short_oid};

#[derive(Args)]
pub struct StatusArgs {
    /// Give the output in the short format
    #[arg(short, long)]
    short: bool,
}

pub fn run(args: &StatusArgs) -> Result<i32> {
    let repo = open_repo()?;
    let status = repo.status()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.short {
        print_short(&status, &mut out)?;
        return Ok(0);
    }

    match repo.refs().current_branch()? {
        Some(branch) => writeln!(out, "On branch {branch}")?,
        None => {
            let head = repo.require_head()?;
            writeln!(out, "HEAD detached at {}", short_oid(&head))?;
        }
    }

    if repo.merge_in_progress() {
        writeln!(out, "You have unmerged paths or an unfinished merge.")?;
        writeln!(out, "  (use \"minigit commit\" to conclude the merge)")?;
        writeln!(out, "  (use \"minigit merge --abort\" to abort it)")?;
    }

    if status.has_staged_changes() {
        writeln!(out, "\nChanges to be committed:")?;
        for path in &status.staged_new {
            writeln!(out, "\tnew file:   {path}")?;
        }
        for path in &status.staged_modified {
            writeln!(out, "\tmodified:   {path}")?;
        }
        for path in &status.staged_deleted {
            writeln!(out, "\tdeleted:    {path}")?;
        }
    }

    if !status.unstaged_modified.is_empty() || !status.unstaged_deleted.is_empty() {
        writeln!(out, "\nChanges not staged for commit:")?;
        for path in &status.unstaged_modified {
            writeln!(out, "\tmodified:   {path}")?;
        }
        for path in &status.unstaged_deleted {
            writeln!(out, "\tdeleted:    {path}")?;
        }
    }

    if !status.untracked.is_empty() {
        writeln!(out, "\nUntracked files:")?;
        for path in &status.untracked {
            writeln!(out, "\t{path}")?;
        }
    }

    if status.is_clean() {
        writeln!(out, "nothing to commit, working tree clean")?;
    }

    Ok(0)
}

fn print_short(status: &minigit_repository::Status, out: &mut impl Write) -> Result<()> {
    use std::collections::BTreeMap;

    let mut rows: BTreeMap<&bstr::BString, (char, char)> = BTreeMap::new();
    for path in &status.staged_new {
        rows.entry(path).or_insert((' ', ' ')).0 = 'A';
    }
    for path in &status.staged_modified {
        rows.entry(path).or_insert((' ', ' ')).0 = 'M';
    }
    for path in &status.staged_deleted {
        rows.entry(path).or_insert((' ', ' ')).0 = 'D';
    }
    for path in &status.unstaged_modified {
        rows.entry(path).or_insert((' ', ' ')).1 = 'M';
    }
    for path in &status.unstaged_deleted {
        rows.entry(path).or_insert((' ', ' ')).1 = 'D';
    }
    for path in &status.untracked {
        rows.entry(path).or_insert(('?', '?'));
    }

    for (path, (staged, unstaged)) in rows {
        writeln!(out, "{staged}{unstaged} {path}")?;
    }
    Ok(())
}
