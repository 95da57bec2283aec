use std::io::{self, Write};

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use minigit_diff::{unified, FileDiff, DEFAULT_CONTEXT};
use minigit_hash::ObjectId;
use minigit_object::Object;
use minigit_repository::Repository;
use minigit_revwalk::resolve;

use super::{open_repo, short_oid};

#[derive(Args)]
pub struct ShowArgs {
    /// Revision or object to show (defaults to HEAD)
    rev: Option<String>,
}

pub fn run(args: &ShowArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = resolve(&repo, args.rev.as_deref().unwrap_or("HEAD"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    show_object(&repo, &oid, &mut out)?;
    Ok(0)
}

fn show_object(repo: &Repository, oid: &ObjectId, out: &mut impl Write) -> Result<()> {
    match repo.odb().read_object(oid)? {
        Object::Blob(blob) => {
            out.write_all(&blob.data)?;
        }
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
        Object::Tag(tag) => {
            writeln!(out, "tag {}", tag.tag_name)?;
            if let Some(ref tagger) = tag.tagger {
                writeln!(out, "Tagger: {} <{}>", tagger.name, tagger.email)?;
                writeln!(out, "Date:   {}", tagger.date.format_default())?;
            }
            writeln!(out)?;
            out.write_all(&tag.message)?;
            writeln!(out)?;
            show_object(repo, &tag.target, out)?;
        }
        Object::Commit(commit) => {
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
            writeln!(out)?;

            // Diff against the first parent (everything is new for a root).
            let files = diff_against_first_parent(repo, oid, &commit)?;
            out.write_all(unified::format(&files).as_slice())?;
        }
    }
    Ok(())
}

fn diff_against_first_parent(
    repo: &Repository,
    oid: &ObjectId,
    commit: &minigit_object::Commit,
) -> Result<Vec<FileDiff>> {
    let new_files = repo.commit_tree_files(oid)?;
    let old_files = match commit.first_parent() {
        Some(parent) => repo.commit_tree_files(parent)?,
        None => Default::default(),
    };

    let mut paths: Vec<_> = old_files.keys().chain(new_files.keys()).collect();
    paths.sort();
    paths.dedup();

    let mut files = Vec::new();
    for path in paths {
        let old = match old_files.get(path) {
            Some(leaf) => Some((repo.odb().read(&leaf.oid)?.1, leaf.mode)),
            None => None,
        };
        let new = match new_files.get(path) {
            Some(leaf) => Some((repo.odb().read(&leaf.oid)?.1, leaf.mode)),
            None => None,
        };
        let old_ref = old.as_ref().map(|(c, m)| (c.as_slice(), *m));
        let new_ref = new.as_ref().map(|(c, m)| (c.as_slice(), *m));
        if let Some(diff) = FileDiff::compute(path.clone(), old_ref, new_ref, DEFAULT_CONTEXT) {
            files.push(diff);
        }
    }
    Ok(files)
}
