use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use minigit_hash::{Hasher, ObjectId};
use minigit_object::header;
use minigit_object::{Object, ObjectType};

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Write an object. Returns the OID.
    ///
    /// No-op if the object already exists (content-addressed idempotency).
    /// The file is written atomically (temp file + rename) with read-only
    /// permissions.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, OdbError> {
        let body = obj.serialize_body();
        self.write_raw(obj.object_type(), &body)
    }

    /// Write raw body bytes with a known kind. Returns the OID.
    pub fn write_raw(&self, obj_type: ObjectType, body: &[u8]) -> Result<ObjectId, OdbError> {
        let hdr = header::write_header(obj_type, body.len());

        // The OID is the hash of the uncompressed header + body.
        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(body);
            hasher.finalize()?
        };

        if self.contains(&oid) {
            return Ok(oid);
        }

        let final_path = self.object_path(&oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = write_to_temp(self.objects_dir(), &hdr, body, self.compression_level)?;
        finalize_object(&tmp_path, &final_path)?;

        Ok(oid)
    }
}

/// Compress header + body into a uniquely named temp file under `objects_dir`.
fn write_to_temp(
    objects_dir: &Path,
    hdr: &[u8],
    body: &[u8],
    level: flate2::Compression,
) -> Result<std::path::PathBuf, OdbError> {
    let tmp_path = objects_dir.join(format!(
        "tmp_obj_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos()
    ));

    let file = fs::File::create(&tmp_path)?;
    let mut encoder = ZlibEncoder::new(file, level);
    encoder.write_all(hdr)?;
    encoder.write_all(body)?;
    encoder.finish()?;

    // Objects are immutable: 0444 on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o444))?;
    }

    Ok(tmp_path)
}

/// Atomically move a temp file to its final destination.
///
/// If the destination already exists (a concurrent writer finished first),
/// the temp file is removed and the write counts as successful.
fn finalize_object(tmp: &Path, final_path: &Path) -> Result<(), OdbError> {
    match fs::rename(tmp, final_path) {
        Ok(()) => Ok(()),
        Err(_) if final_path.exists() => {
            let _ = fs::remove_file(tmp);
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(tmp);
            Err(OdbError::Io(e))
        }
    }
}
