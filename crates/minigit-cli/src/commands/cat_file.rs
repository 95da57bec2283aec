use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use minigit_object::Object;
use minigit_revwalk::resolve;

use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show the object's kind
    #[arg(short = 't', conflicts_with_all = ["size", "pretty"])]
    kind: bool,

    /// Show the object's body size
    #[arg(short = 's', conflicts_with = "pretty")]
    size: bool,

    /// Pretty-print the object's content
    #[arg(short = 'p')]
    pretty: bool,

    /// The object to inspect
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = resolve(&repo, &args.object)?;
    let (obj_type, body) = repo.odb().read(&oid)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.kind {
        writeln!(out, "{obj_type}")?;
        return Ok(0);
    }
    if args.size {
        writeln!(out, "{}", body.len())?;
        return Ok(0);
    }
    if !args.pretty {
        bail!("expected one of -t, -s, or -p");
    }

    match Object::parse_body(obj_type, &body)? {
        Object::Blob(blob) => out.write_all(&blob.data)?,
        Object::Commit(_) | Object::Tag(_) => out.write_all(&body)?,
        Object::Tree(tree) => {
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
    }
    Ok(0)
}
