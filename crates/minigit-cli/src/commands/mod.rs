pub mod add;
pub mod branch;
pub mod cat_file;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod hash_object;
pub mod init;
pub mod log;
pub mod ls_tree;
pub mod merge;
pub mod restore;
pub mod rev_parse;
pub mod rm;
pub mod show;
pub mod status;
pub mod tag;
pub mod write_tree;

use anyhow::Result;
use bstr::BString;
use clap::Subcommand;
use minigit_repository::Repository;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository or reinitialize an existing one
    Init(init::InitArgs),
    /// Add file contents to the index
    Add(add::AddArgs),
    /// Remove files from the working tree and from the index
    Rm(rm::RmArgs),
    /// Restore working tree files
    Restore(restore::RestoreArgs),
    /// Show the working tree status
    Status(status::StatusArgs),
    /// Record changes to the repository
    Commit(commit::CommitArgs),
    /// List, create, or delete branches
    Branch(branch::BranchArgs),
    /// Switch branches or restore working tree files
    Checkout(checkout::CheckoutArgs),
    /// Join two development histories together
    Merge(merge::MergeArgs),
    /// Create, list, or delete tags
    Tag(tag::TagArgs),
    /// Show commit logs
    Log(log::LogArgs),
    /// Show various types of objects
    Show(show::ShowArgs),
    /// Show changes between commits, commit and working tree, etc
    Diff(diff::DiffArgs),
    /// Pick out and massage parameters
    RevParse(rev_parse::RevParseArgs),
    /// Provide content or type and size information for repository objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally create a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Create a tree object from the current index
    WriteTree(write_tree::WriteTreeArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Add(args) => add::run(args),
        Commands::Rm(args) => rm::run(args),
        Commands::Restore(args) => restore::run(args),
        Commands::Status(args) => status::run(args),
        Commands::Commit(args) => commit::run(args),
        Commands::Branch(args) => branch::run(args),
        Commands::Checkout(args) => checkout::run(args),
        Commands::Merge(args) => merge::run(args),
        Commands::Tag(args) => tag::run(args),
        Commands::Log(args) => log::run(args),
        Commands::Show(args) => show::run(args),
        Commands::Diff(args) => diff::run(args),
        Commands::RevParse(args) => rev_parse::run(args),
        Commands::CatFile(args) => cat_file::run(args),
        Commands::HashObject(args) => hash_object::run(args),
        Commands::LsTree(args) => ls_tree::run(args),
        Commands::WriteTree(args) => write_tree::run(args),
    }
}

/// Open the repository containing the current directory.
pub fn open_repo() -> Result<Repository> {
    Ok(Repository::discover(".")?)
}

/// Translate user-supplied paths (relative to the current directory) into
/// canonical repo-relative paths.
pub fn repo_paths(repo: &Repository, inputs: &[String]) -> Result<Vec<BString>> {
    let cwd = std::env::current_dir()?;
    let prefix = cwd
        .strip_prefix(repo.work_tree())
        .unwrap_or_else(|_| std::path::Path::new(""))
        .to_string_lossy()
        .into_owned();

    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let joined = if prefix.is_empty() {
            input.clone()
        } else {
            format!("{prefix}/{input}")
        };
        out.push(minigit_utils::path::normalize(&joined)?);
    }
    Ok(out)
}

/// Short (7-char) OID rendering for human output.
pub fn short_oid(oid: &minigit_hash::ObjectId) -> String {
    oid.to_hex()[..7].to_string()
}
