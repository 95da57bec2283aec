use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use minigit_hash::Hasher;
use minigit_object::ObjectType;

use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Read content from standard input
    #[arg(long)]
    stdin: bool,

    /// Files to hash
    files: Vec<PathBuf>,
}

pub fn run(args: &HashObjectArgs) -> Result<i32> {
    let mut contents: Vec<Vec<u8>> = Vec::new();

    if args.stdin {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        contents.push(buf);
    }
    for file in &args.files {
        contents.push(std::fs::read(file)?);
    }

    if args.write {
        let repo = open_repo()?;
        for content in &contents {
            let oid = repo.odb().write_raw(ObjectType::Blob, content)?;
            println!("{}", oid.to_hex());
        }
    } else {
        for content in &contents {
            let oid = Hasher::hash_object("blob", content)?;
            println!("{}", oid.to_hex());
        }
    }

    Ok(0)
}
