use std::io::{self, Write};

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use minigit_revwalk::{resolve_commit, RevWalk};

use super::{open_repo, short_oid};

#[derive(Args)]
pub struct LogArgs {
    /// Revision to start from (defaults to HEAD)
    rev: Option<String>,

    /// Limit the number of commits shown
    #[arg(short = 'n', long = "max-count", value_name = "count")]
    max_count: Option<usize>,

    /// One line per commit
    #[arg(long)]
    oneline: bool,
}

pub fn run(args: &LogArgs) -> Result<i32> {
    let repo = open_repo()?;
    let start = resolve_commit(&repo, args.rev.as_deref().unwrap_or("HEAD"))?;

    let mut walk = RevWalk::new(&repo);
    walk.push(start)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut shown = 0usize;
    for oid in walk {
        let oid = oid?;
        if let Some(max) = args.max_count {
            if shown >= max {
                break;
            }
        }
        let commit = repo.read_commit(&oid)?;

        if args.oneline {
            writeln!(out, "{} {}", short_oid(&oid), commit.summary())?;
        } else {
            if shown > 0 {
                writeln!(out)?;
            }
            writeln!(out, "commit {}", oid.to_hex())?;
            if commit.is_merge() {
                let shorts: Vec<String> = commit.parents.iter().map(short_oid).collect();
                writeln!(out, "Merge: {}", shorts.join(" "))?;
            }
            writeln!(
                out,
                "Author: {} <{}>",
                commit.author.name, commit.author.email
            )?;
            writeln!(out, "Date:   {}", commit.author.date.format_default())?;
            writeln!(out)?;
            for line in commit.message.lines() {
                writeln!(out, "    {}", line.as_bstr())?;
            }
        }
        shown += 1;
    }

    Ok(0)
}
