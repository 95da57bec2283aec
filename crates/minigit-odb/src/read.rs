use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use minigit_hash::ObjectId;
use minigit_object::{header, Object, ObjectType};

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Read an object by OID, returning its kind and body bytes.
    ///
    /// Errors with `NotFound` if the object does not exist and `Corrupt` if
    /// it exists but fails inflation or header validation.
    pub fn read(&self, oid: &ObjectId) -> Result<(ObjectType, Vec<u8>), OdbError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::NotFound(oid.to_hex()));
            }
            Err(e) => return Err(OdbError::Io(e)),
        };

        let decompressed = inflate_all(&compressed, oid)?;

        let (obj_type, body_size, header_len) =
            header::parse_header(&decompressed).map_err(|e| OdbError::Corrupt {
                oid: oid.to_hex(),
                reason: e.to_string(),
            })?;
        let body = &decompressed[header_len..];
        if body.len() != body_size {
            return Err(OdbError::Corrupt {
                oid: oid.to_hex(),
                reason: format!(
                    "size mismatch: header says {}, body has {}",
                    body_size,
                    body.len()
                ),
            });
        }

        Ok((obj_type, body.to_vec()))
    }

    /// Read and parse an object into its typed form.
    pub fn read_object(&self, oid: &ObjectId) -> Result<Object, OdbError> {
        let (obj_type, body) = self.read(oid)?;
        Ok(Object::parse_body(obj_type, &body)?)
    }

    /// Read just the kind and size without keeping the body.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectType, usize), OdbError> {
        let (obj_type, body) = self.read(oid)?;
        Ok((obj_type, body.len()))
    }
}

/// Zlib-decompress the full contents of a loose object file.
fn inflate_all(compressed: &[u8], oid: &ObjectId) -> Result<Vec<u8>, OdbError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| OdbError::Corrupt {
            oid: oid.to_hex(),
            reason: format!("inflate failed: {e}"),
        })?;
    Ok(decompressed)
}
