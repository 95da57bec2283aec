//! Hash computation and object identity.
//!
//! Provides the core `ObjectId` type (a 160-bit SHA-1 digest), hex
//! encoding/decoding, and the streaming hasher used throughout minigit.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use hasher::Hasher;
pub use oid::ObjectId;
