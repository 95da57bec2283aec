use std::io::{self, Write};

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use minigit_revwalk::resolve;

use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Tree-ish to list
    tree_ish: String,

    /// Recurse into sub-trees, listing blob leaves with full paths
    #[arg(short = 'r')]
    recursive: bool,
}

pub fn run(args: &LsTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = resolve(&repo, &args.tree_ish)?;

    // Peel commits (and tags) down to their tree.
    let tree_oid = minigit_revwalk::resolve(&repo, &format!("{}^{{tree}}", args.tree_ish))
        .unwrap_or(oid);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.recursive {
        for (path, leaf) in repo.walk_tree(&tree_oid)? {
            writeln!(
                out,
                "{:06o} blob {}\t{}",
                leaf.mode.raw(),
                leaf.oid.to_hex(),
                path.as_bstr()
            )?;
        }
    } else {
        let tree = repo.read_tree(&tree_oid)?;
        for entry in tree.iter() {
            let kind = if entry.mode.is_tree() { "tree" } else { "blob" };
            writeln!(
                out,
                "{:06o} {} {}\t{}",
                entry.mode.raw(),
                kind,
                entry.oid.to_hex(),
                entry.name
            )?;
        }
    }

    Ok(0)
}
