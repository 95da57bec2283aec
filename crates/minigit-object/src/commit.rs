use bstr::{BStr, BString, ByteSlice};
use minigit_hash::ObjectId;
use minigit_utils::date::Signature;

use crate::ObjectError;

/// A commit object: a snapshot pointer with ancestry.
///
/// Headers appear in fixed order: `tree`, zero or more `parent`, `author`,
/// `committer`, then a blank line and the free-form message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: ObjectId,
    /// Parent commit OIDs (empty for a root commit).
    pub parents: Vec<ObjectId>,
    /// Author identity and timestamp.
    pub author: Signature,
    /// Committer identity and timestamp.
    pub committer: Signature,
    /// Commit message (everything after the blank-line separator, verbatim).
    pub message: BString,
}

impl Commit {
    /// Parse a commit body (no object header).
    pub fn parse(body: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;

        let mut pos = 0;
        loop {
            if pos >= body.len() {
                break;
            }
            // A blank line separates headers from the message.
            if body[pos] == b'\n' {
                pos += 1;
                break;
            }

            let line_end = body[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|p| p + pos)
                .unwrap_or(body.len());
            let line = &body[pos..line_end];

            let space_pos = line
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidHeader("malformed commit header line".into()))?;
            let key = &line[..space_pos];
            let value = &line[space_pos + 1..];

            match key {
                b"tree" => {
                    tree = Some(parse_oid(value, "tree")?);
                }
                b"parent" => {
                    parents.push(parse_oid(value, "parent")?);
                }
                b"author" => {
                    author = Some(parse_signature(value)?);
                }
                b"committer" => {
                    committer = Some(parse_signature(value)?);
                }
                _ => {
                    return Err(ObjectError::InvalidHeader(format!(
                        "unknown commit header: {}",
                        BStr::new(key)
                    )));
                }
            }

            pos = line_end + 1;
        }

        let tree = tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let author = author.ok_or(ObjectError::MissingCommitField { field: "author" })?;
        let committer = committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?;

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            message: BString::from(&body[pos..]),
        })
    }

    /// Serialize the commit body (no object header). Headers are emitted in
    /// fixed order; message bytes are appended verbatim.
    pub fn serialize_body(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');

        for parent in &self.parents {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }

        out.extend_from_slice(b"author ");
        out.extend_from_slice(&self.author.to_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"committer ");
        out.extend_from_slice(&self.committer.to_bytes());
        out.push(b'\n');

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        out
    }

    /// Get the first parent (None for root commits).
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Is this a merge commit? (more than one parent)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Is this a root commit? (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Get the summary (first line) of the message.
    pub fn summary(&self) -> &BStr {
        let msg: &[u8] = self.message.as_ref();
        match msg.find_byte(b'\n') {
            Some(pos) => BStr::new(&msg[..pos]),
            None => BStr::new(msg),
        }
    }
}

fn parse_oid(value: &[u8], field: &'static str) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::InvalidHeader(format!("non-UTF8 {field} OID")))?;
    Ok(ObjectId::from_hex(hex)?)
}

fn parse_signature(value: &[u8]) -> Result<Signature, ObjectError> {
    Signature::parse(BStr::new(value)).map_err(|e| ObjectError::InvalidSignature(e.to_string()))
}
