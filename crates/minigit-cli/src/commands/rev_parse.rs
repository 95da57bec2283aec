use anyhow::Result;
use clap::Args;
use minigit_revwalk::resolve;

use super::open_repo;

#[derive(Args)]
pub struct RevParseArgs {
    /// Revision expressions to resolve
    revs: Vec<String>,
}

pub fn run(args: &RevParseArgs) -> Result<i32> {
    let repo = open_repo()?;
    for rev in &args.revs {
        println!("{}", resolve(&repo, rev)?.to_hex());
    }
    Ok(0)
}
