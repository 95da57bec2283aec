use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use minigit_repository::Repository;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    directory: Option<PathBuf>,
}

pub fn run(args: &InitArgs) -> Result<i32> {
    let path = args
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let repo = Repository::init(&path)?;
    println!(
        "Initialized empty minigit repository in {}",
        repo.minigit_dir().display()
    );
    Ok(0)
}
