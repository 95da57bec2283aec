use anyhow::{bail, Result};
use bstr::BString;
use clap::Args;
use minigit_object::{Object, Tag};
use minigit_ref::RefName;
use minigit_repository::Identity;
use minigit_revwalk::resolve;

use super::open_repo;

#[derive(Args)]
pub struct TagArgs {
    /// Tag name
    name: Option<String>,

    /// Object the tag points at (defaults to HEAD)
    target: Option<String>,

    /// Create an annotated tag object
    #[arg(short = 'a')]
    annotate: bool,

    /// Tag message (implies an annotated tag)
    #[arg(short = 'm', num_args = 1)]
    message: Vec<String>,

    /// Delete the named tag
    #[arg(short = 'd')]
    delete: bool,
}

pub fn run(args: &TagArgs) -> Result<i32> {
    let repo = open_repo()?;

    let Some(ref name) = args.name else {
        // List mode.
        for tag in repo.refs().list("refs/tags")? {
            println!("{}", tag.short_name());
        }
        return Ok(0);
    };

    if args.delete {
        let tag_ref = RefName::tag(name)?;
        if !repo.refs().exists(&tag_ref) {
            bail!("tag '{name}' not found");
        }
        repo.refs().delete_ref(&tag_ref)?;
        println!("Deleted tag '{name}'");
        return Ok(0);
    }

    let target = match &args.target {
        Some(rev) => resolve(&repo, rev)?,
        None => repo.require_head()?,
    };

    let tag_ref = RefName::tag(name)?;
    if repo.refs().exists(&tag_ref) {
        bail!("tag '{name}' already exists");
    }

    let annotated = args.annotate || !args.message.is_empty();
    if annotated {
        let mut message = args.message.join("\n\n");
        if !message.is_empty() && !message.ends_with('\n') {
            message.push('\n');
        }
        let (target_type, _) = repo.odb().read(&target)?;
        let identity = Identity::from_env();
        let tag = Tag {
            target,
            target_type,
            tag_name: BString::from(name.as_str()),
            tagger: Some(identity.committer),
            message: BString::from(message),
        };
        let tag_oid = repo.odb().write(&Object::Tag(tag))?;
        repo.refs().write_ref(&tag_ref, &tag_oid)?;
    } else {
        repo.refs().write_ref(&tag_ref, &target)?;
    }

    Ok(0)
}
