//! Index file reading (format v2).

use bstr::BString;
use minigit_hash::{Hasher, ObjectId};
use minigit_object::FileMode;

use crate::entry::{IndexEntry, StatData};
use crate::{Index, IndexError};

/// Magic bytes at the start of every index file.
const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

/// Fixed portion of an on-disk entry: 10 u32 stat/mode fields, a 20-byte
/// OID, and a u16 flags word.
const ENTRY_FIXED_SIZE: usize = 62;

/// Parse an index file from raw bytes.
pub fn parse_index(data: &[u8]) -> Result<Index, IndexError> {
    if data.len() < 12 + 20 {
        return Err(IndexError::InvalidHeader("index file too short".into()));
    }

    // Verify the trailing checksum before trusting any field.
    verify_checksum(data)?;

    let mut cursor = 0;

    let sig = &data[cursor..cursor + 4];
    if sig != INDEX_SIGNATURE {
        return Err(IndexError::InvalidHeader(format!(
            "bad signature: expected DIRC, got {:?}",
            sig
        )));
    }
    cursor += 4;

    let version = read_u32(&data[cursor..]);
    cursor += 4;
    if version != 2 {
        return Err(IndexError::UnsupportedVersion(version));
    }

    let entry_count = read_u32(&data[cursor..]) as usize;
    cursor += 4;

    let content_end = data.len() - 20;
    let mut entries = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let (entry, new_cursor) = parse_entry(data, cursor, content_end)?;
        entries.push(entry);
        cursor = new_cursor;
    }

    if cursor != content_end {
        return Err(IndexError::InvalidHeader(format!(
            "trailing bytes after {} entries",
            entry_count
        )));
    }

    Ok(Index { entries })
}

/// Total on-disk entry size: fixed part + NUL-terminated name, zero-padded
/// so the entry length is a multiple of 8 (1–8 padding bytes, the first of
/// which is the NUL terminator).
fn ondisk_entry_size(name_len: usize) -> usize {
    (ENTRY_FIXED_SIZE + name_len + 8) & !7
}

/// Parse a single entry starting at `start`.
fn parse_entry(
    data: &[u8],
    start: usize,
    content_end: usize,
) -> Result<(IndexEntry, usize), IndexError> {
    if start + ENTRY_FIXED_SIZE > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry too short".into(),
        });
    }

    let mut cursor = start;

    let stat = StatData {
        ctime_secs: read_u32(&data[cursor..]),
        ctime_nsecs: read_u32(&data[cursor + 4..]),
        mtime_secs: read_u32(&data[cursor + 8..]),
        mtime_nsecs: read_u32(&data[cursor + 12..]),
        dev: read_u32(&data[cursor + 16..]),
        ino: read_u32(&data[cursor + 20..]),
        uid: read_u32(&data[cursor + 28..]),
        gid: read_u32(&data[cursor + 32..]),
        size: read_u32(&data[cursor + 36..]),
    };
    let mode_raw = read_u32(&data[cursor + 24..]);
    cursor += 40;

    let oid = ObjectId::from_bytes(&data[cursor..cursor + 20]).map_err(|_| {
        IndexError::InvalidEntry {
            offset: start,
            reason: "invalid OID".into(),
        }
    })?;
    cursor += 20;

    let flags = read_u16(&data[cursor..]);
    cursor += 2;

    // v2 has no extended flags and this index stages no merge conflicts.
    if flags & 0x7000 != 0 {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: format!("unsupported flag bits: {flags:#06x}"),
        });
    }

    let nul_pos = data[cursor..content_end]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| IndexError::InvalidEntry {
            offset: start,
            reason: "missing NUL after path".into(),
        })?;
    let path = BString::from(&data[cursor..cursor + nul_pos]);

    if path.is_empty() || path[0] == b'/' {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "invalid path".into(),
        });
    }

    let name_len_field = (flags & 0x0FFF) as usize;
    if name_len_field != nul_pos.min(0x0FFF) {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: format!(
                "name length field {} does not match path length {}",
                name_len_field, nul_pos
            ),
        });
    }

    let entry_size = ondisk_entry_size(nul_pos);
    let end = start + entry_size;
    if end > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry overruns index".into(),
        });
    }

    // The padding must be zero bytes.
    if data[cursor + nul_pos..end].iter().any(|&b| b != 0) {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "non-zero entry padding".into(),
        });
    }

    let mode = FileMode::from_raw(mode_raw).ok_or_else(|| IndexError::InvalidEntry {
        offset: start,
        reason: format!("invalid mode: {mode_raw:o}"),
    })?;

    Ok((
        IndexEntry {
            path,
            oid,
            mode,
            stat,
        },
        end,
    ))
}

/// Verify the trailing SHA-1 over all preceding bytes.
fn verify_checksum(data: &[u8]) -> Result<(), IndexError> {
    let content = &data[..data.len() - 20];
    let stored = &data[data.len() - 20..];

    let computed = Hasher::digest(content).map_err(|_| IndexError::ChecksumMismatch)?;
    if computed.as_bytes() != stored {
        return Err(IndexError::ChecksumMismatch);
    }
    Ok(())
}

fn read_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

fn read_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}
