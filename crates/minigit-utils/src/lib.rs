//! Foundation utilities shared by every minigit crate: byte-string
//! re-exports, dates and signatures, repository-relative path handling,
//! and atomic file replacement.

pub mod date;
pub mod error;
pub mod path;
pub mod tempfile;

// Re-export core types at crate root for convenience
pub use bstr::{BStr, BString, ByteSlice, ByteVec};
pub use error::UtilError;

pub type Result<T> = std::result::Result<T, UtilError>;
