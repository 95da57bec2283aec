use bstr::{BStr, BString};
use minigit_hash::ObjectId;
use minigit_utils::date::Signature;

use crate::{ObjectError, ObjectType};

/// An annotated tag object.
///
/// Lightweight tags are plain refs and have no object; this type represents
/// only the annotated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// OID of the tagged object.
    pub target: ObjectId,
    /// Kind of the tagged object.
    pub target_type: ObjectType,
    /// Tag name.
    pub tag_name: BString,
    /// Tagger identity and timestamp.
    pub tagger: Option<Signature>,
    /// Tag message.
    pub message: BString,
}

impl Tag {
    /// Parse a tag body (no object header).
    pub fn parse(body: &[u8]) -> Result<Self, ObjectError> {
        let mut target: Option<ObjectId> = None;
        let mut target_type: Option<ObjectType> = None;
        let mut tag_name: Option<BString> = None;
        let mut tagger: Option<Signature> = None;

        let mut pos = 0;
        loop {
            if pos >= body.len() {
                break;
            }
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
                .ok_or_else(|| ObjectError::InvalidHeader("malformed tag header line".into()))?;
            let key = &line[..space_pos];
            let value = &line[space_pos + 1..];

            match key {
                b"object" => {
                    let hex = std::str::from_utf8(value)
                        .map_err(|_| ObjectError::InvalidHeader("non-UTF8 target OID".into()))?;
                    target = Some(ObjectId::from_hex(hex)?);
                }
                b"type" => {
                    target_type = Some(ObjectType::from_bytes(value)?);
                }
                b"tag" => {
                    tag_name = Some(BString::from(value));
                }
                b"tagger" => {
                    tagger = Some(
                        Signature::parse(BStr::new(value))
                            .map_err(|e| ObjectError::InvalidSignature(e.to_string()))?,
                    );
                }
                _ => {
                    return Err(ObjectError::InvalidHeader(format!(
                        "unknown tag header: {}",
                        BStr::new(key)
                    )));
                }
            }

            pos = line_end + 1;
        }

        let target = target.ok_or(ObjectError::MissingTagField { field: "object" })?;
        let target_type = target_type.ok_or(ObjectError::MissingTagField { field: "type" })?;
        let tag_name = tag_name.ok_or(ObjectError::MissingTagField { field: "tag" })?;

        Ok(Self {
            target,
            target_type,
            tag_name,
            tagger,
            message: BString::from(&body[pos..]),
        })
    }

    /// Serialize the tag body (no object header).
    pub fn serialize_body(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"object ");
        out.extend_from_slice(self.target.to_hex().as_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"type ");
        out.extend_from_slice(self.target_type.as_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"tag ");
        out.extend_from_slice(&self.tag_name);
        out.push(b'\n');

        if let Some(ref tagger) = self.tagger {
            out.extend_from_slice(b"tagger ");
            out.extend_from_slice(&tagger.to_bytes());
            out.push(b'\n');
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        out
    }
}
