//! Revision-expression evaluation.
//!
//! Base lookup order: `HEAD`; then `refs/heads/<name>`, `refs/tags/<name>`,
//! `refs/<name>`, the literal ref path; finally a hex prefix. A bare lookup
//! on a tag ref yields the tag object's OID; dereferencing happens only
//! where a specific kind is required.

use bstr::ByteSlice;
use minigit_hash::ObjectId;
use minigit_object::name::{is_hex_prefix, parse_revision, RevisionSuffix};
use minigit_object::{Commit, Object, ObjectType};
use minigit_odb::OdbError;
use minigit_ref::RefName;
use minigit_repository::Repository;

use crate::RevWalkError;

/// Resolve a revision expression to an OID.
pub fn resolve(repo: &Repository, input: &str) -> Result<ObjectId, RevWalkError> {
    let expr = parse_revision(input)?;
    let mut oid = resolve_base(repo, &expr.base)?;

    for suffix in &expr.suffixes {
        match suffix {
            RevisionSuffix::Parent(0) => {}
            RevisionSuffix::Parent(n) => {
                let commit = peel_to_commit(repo, &oid, input)?;
                oid = *commit
                    .parents
                    .get(*n as usize - 1)
                    .ok_or_else(|| RevWalkError::Unknown(input.to_string()))?;
            }
            RevisionSuffix::Ancestor(n) => {
                for _ in 0..*n {
                    let commit = peel_to_commit(repo, &oid, input)?;
                    oid = *commit
                        .first_parent()
                        .ok_or_else(|| RevWalkError::Unknown(input.to_string()))?;
                }
            }
            RevisionSuffix::Peel(kind) => {
                oid = peel_to_kind(repo, &oid, *kind, input)?;
            }
        }
    }

    if let Some(ref path) = expr.path {
        let commit = peel_to_commit(repo, &oid, input)?;
        let entry = repo
            .lookup_tree_path(&commit.tree, path.as_bstr())
            .map_err(RevWalkError::Repo)?;
        oid = entry
            .map(|(oid, _)| oid)
            .ok_or_else(|| RevWalkError::PathNotFound {
                rev: input.to_string(),
                path: path.to_string(),
            })?;
    }

    Ok(oid)
}

/// Resolve a revision expression and dereference to a commit OID.
pub fn resolve_commit(repo: &Repository, input: &str) -> Result<ObjectId, RevWalkError> {
    let oid = resolve(repo, input)?;
    peel_oid_to_kind(repo, oid, ObjectType::Commit, input)
}

fn resolve_base(repo: &Repository, base: &str) -> Result<ObjectId, RevWalkError> {
    if base == "HEAD" {
        return repo
            .head_oid()
            .map_err(RevWalkError::Repo)?
            .ok_or_else(|| RevWalkError::Unknown("HEAD".to_string()));
    }

    let candidates = [
        format!("refs/heads/{base}"),
        format!("refs/tags/{base}"),
        format!("refs/{base}"),
        base.to_string(),
    ];
    for candidate in candidates {
        let Ok(name) = RefName::new(candidate) else {
            continue;
        };
        if let Some(oid) = repo.refs().resolve(&name)? {
            return Ok(oid);
        }
    }

    if is_hex_prefix(base) {
        match repo.odb().expand_prefix(base) {
            Ok(oid) => return Ok(oid),
            Err(OdbError::Ambiguous { prefix, .. }) => {
                return Err(RevWalkError::Ambiguous(prefix));
            }
            Err(OdbError::NotFound(_)) => {}
            Err(e) => return Err(RevWalkError::Repo(e.into())),
        }
    }

    Err(RevWalkError::Unknown(base.to_string()))
}

/// Follow tag chains until a commit is reached.
fn peel_to_commit(repo: &Repository, oid: &ObjectId, rev: &str) -> Result<Commit, RevWalkError> {
    let mut current = *oid;
    loop {
        match repo.odb().read_object(&current).map_err(map_odb(rev))? {
            Object::Commit(c) => return Ok(c),
            Object::Tag(t) => current = t.target,
            _ => return Err(RevWalkError::NotACommit(rev.to_string())),
        }
    }
}

/// Peel an OID until the requested kind is reached: tags follow their
/// `object` chain, and a commit peels to its tree when a tree is wanted.
fn peel_to_kind(
    repo: &Repository,
    oid: &ObjectId,
    kind: ObjectType,
    rev: &str,
) -> Result<ObjectId, RevWalkError> {
    peel_oid_to_kind(repo, *oid, kind, rev)
}

fn peel_oid_to_kind(
    repo: &Repository,
    oid: ObjectId,
    kind: ObjectType,
    rev: &str,
) -> Result<ObjectId, RevWalkError> {
    let mut current = oid;
    loop {
        let obj = repo.odb().read_object(&current).map_err(map_odb(rev))?;
        if obj.object_type() == kind {
            return Ok(current);
        }
        match obj {
            Object::Tag(t) => current = t.target,
            Object::Commit(c) if kind == ObjectType::Tree => current = c.tree,
            _ => return Err(RevWalkError::NotACommit(rev.to_string())),
        }
    }
}

fn map_odb(rev: &str) -> impl Fn(OdbError) -> RevWalkError + '_ {
    move |e| match e {
        OdbError::NotFound(_) => RevWalkError::Unknown(rev.to_string()),
        other => RevWalkError::Repo(other.into()),
    }
}
