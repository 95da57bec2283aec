//! Object model: blob, tree, commit, tag parsing and serialization.
//!
//! Provides Rust types for the four object kinds, their parsing from raw
//! bytes, canonical serialization, and the revision-expression grammar.

mod blob;
mod commit;
pub mod header;
pub mod name;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tag::Tag;
pub use tree::{FileMode, Tree, TreeEntry};

use bstr::BString;
use minigit_hash::{HashError, ObjectId};

/// Errors produced by object parsing and serialization.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object kind: {0}")]
    InvalidKind(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("truncated object: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid commit: missing '{field}' header")]
    MissingCommitField { field: &'static str },

    #[error("invalid tag: missing '{field}' header")]
    MissingTagField { field: &'static str },

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid revision expression: {0}")]
    InvalidRevision(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The four object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    /// Parse from the kind string in object headers.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::InvalidKind(BString::from(s))),
        }
    }

    /// The canonical byte representation.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Blob => b"blob",
            Self::Tree => b"tree",
            Self::Commit => b"commit",
            Self::Tag => b"tag",
        }
    }

    /// The canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A parsed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Parse from framed bytes (header + body).
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (obj_type, body_size, header_len) = header::parse_header(data)?;
        let body = &data[header_len..];
        if body.len() != body_size {
            return Err(ObjectError::Truncated {
                expected: body_size,
                actual: body.len(),
            });
        }
        Self::parse_body(obj_type, body)
    }

    /// Parse body bytes with a known kind (no header).
    pub fn parse_body(obj_type: ObjectType, body: &[u8]) -> Result<Self, ObjectError> {
        match obj_type {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(body))),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(body)?)),
            ObjectType::Commit => Ok(Self::Commit(Commit::parse(body)?)),
            ObjectType::Tag => Ok(Self::Tag(Tag::parse(body)?)),
        }
    }

    /// Serialize to the canonical framed form (header + body).
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let hdr = header::write_header(self.object_type(), body.len());
        let mut out = Vec::with_capacity(hdr.len() + body.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&body);
        out
    }

    /// Serialize just the body (no header).
    pub fn serialize_body(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.data.to_vec(),
            Self::Tree(t) => t.serialize_body(),
            Self::Commit(c) => c.serialize_body(),
            Self::Tag(t) => t.serialize_body(),
        }
    }

    /// Get the object kind.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
            Self::Commit(_) => ObjectType::Commit,
            Self::Tag(_) => ObjectType::Tag,
        }
    }

    /// Compute the OID by hashing the framed serialization.
    pub fn compute_oid(&self) -> Result<ObjectId, HashError> {
        let body = self.serialize_body();
        minigit_hash::Hasher::hash_object(self.object_type().as_str(), &body)
    }
}
