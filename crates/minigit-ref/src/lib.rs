//! The reference system.
//!
//! Refs are loose files under the repository metadata directory: a *direct*
//! ref contains a 40-hex OID, a *symbolic* ref contains `ref: <target>`.
//! Branches live under `refs/heads/`, tags under `refs/tags/`; `HEAD` is
//! symbolic except when detached.

mod loose;
mod name;
mod store;

pub use name::{validate_branch_name, RefName};
pub use store::RefStore;

use minigit_hash::ObjectId;

/// Errors from ref operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("invalid ref name: {0}")]
    InvalidName(String),

    #[error("ref not found: {0}")]
    NotFound(String),

    #[error("ref already exists: {0}")]
    AlreadyExists(String),

    #[error("malformed ref: {0}")]
    Parse(String),

    #[error("io error on '{path}': {source}")]
    IoPath {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Hash(#[from] minigit_hash::HashError),

    #[error(transparent)]
    Util(#[from] minigit_utils::UtilError),
}

/// A reference — either direct (points at an OID) or symbolic (points at
/// another ref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Direct reference to an object.
    Direct { name: RefName, target: ObjectId },
    /// Symbolic reference to another ref.
    Symbolic { name: RefName, target: RefName },
}

impl Reference {
    /// Get the ref name.
    pub fn name(&self) -> &RefName {
        match self {
            Reference::Direct { name, .. } => name,
            Reference::Symbolic { name, .. } => name,
        }
    }

    /// Is this a symbolic ref?
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Reference::Symbolic { .. })
    }

    /// Get the target OID if this is a direct ref.
    pub fn target_oid(&self) -> Option<ObjectId> {
        match self {
            Reference::Direct { target, .. } => Some(*target),
            Reference::Symbolic { .. } => None,
        }
    }

    /// Get the symbolic target if this is a symbolic ref.
    pub fn symbolic_target(&self) -> Option<&RefName> {
        match self {
            Reference::Symbolic { target, .. } => Some(target),
            Reference::Direct { .. } => None,
        }
    }
}
