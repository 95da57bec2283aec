use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct WriteTreeArgs {}

pub fn run(_args: &WriteTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let index = repo.index()?;
    let tree = index.write_tree(repo.odb())?;
    println!("{}", tree.to_hex());
    Ok(0)
}
