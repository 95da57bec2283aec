//! Short OID expansion (hex prefix → full OID with ambiguity detection).

use std::fs;

use minigit_hash::{hex, ObjectId};

use crate::{ObjectStore, OdbError};

/// Minimum accepted prefix length.
const MINIMUM_ABBREV: usize = 4;

impl ObjectStore {
    /// Expand a hex prefix to a full OID.
    ///
    /// Scans the fan-out directory named by the first two prefix chars.
    /// Errors with `Ambiguous` when more than one object matches and
    /// `NotFound` when none does.
    pub fn expand_prefix(&self, prefix: &str) -> Result<ObjectId, OdbError> {
        if prefix.len() < MINIMUM_ABBREV
            || prefix.len() > 40
            || !hex::is_hex_digits(prefix)
        {
            return Err(OdbError::NotFound(prefix.to_string()));
        }

        let prefix = prefix.to_ascii_lowercase();

        // A full 40-char OID needs only an existence check.
        if prefix.len() == 40 {
            let oid = ObjectId::from_hex(&prefix)?;
            return if self.contains(&oid) {
                Ok(oid)
            } else {
                Err(OdbError::NotFound(prefix))
            };
        }

        let fanout = self.objects_dir().join(&prefix[..2]);
        let rest = &prefix[2..];

        let mut matches: Vec<ObjectId> = Vec::new();
        let entries = match fs::read_dir(&fanout) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::NotFound(prefix));
            }
            Err(e) => return Err(OdbError::Io(e)),
        };

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.len() == 38 && name.starts_with(rest) {
                if let Ok(oid) = ObjectId::from_hex(&format!("{}{}", &prefix[..2], name)) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        match matches.len() {
            0 => Err(OdbError::NotFound(prefix)),
            1 => Ok(matches[0]),
            n => Err(OdbError::Ambiguous { prefix, count: n }),
        }
    }
}
