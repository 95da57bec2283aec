//! Index file writing and tree reification.

use std::io::Write;
use std::path::Path;

use minigit_hash::{Hasher, ObjectId};
use minigit_object::{FileMode, ObjectType, Tree, TreeEntry};
use minigit_odb::ObjectStore;
use minigit_utils::tempfile::TempFile;

use crate::entry::IndexEntry;
use crate::{Index, IndexError};

/// Magic bytes at the start of every index file.
const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

/// Write the index to a file atomically (temp sibling + rename).
pub fn write_index(index: &Index, path: &Path) -> Result<(), IndexError> {
    let data = serialize_index(index)?;
    let mut tmp = TempFile::new_for(path)?;
    tmp.write_all(&data)?;
    tmp.persist(path)?;
    Ok(())
}

/// Serialize the index to bytes: header, sorted entries, trailing checksum.
fn serialize_index(index: &Index) -> Result<Vec<u8>, IndexError> {
    let mut buf = Vec::new();

    buf.extend_from_slice(INDEX_SIGNATURE);
    buf.extend_from_slice(&2u32.to_be_bytes());
    buf.extend_from_slice(&(index.len() as u32).to_be_bytes());

    for entry in index.iter() {
        write_entry(&mut buf, entry);
    }

    let checksum =
        Hasher::digest(&buf).map_err(|_| IndexError::InvalidHeader("checksum failed".into()))?;
    buf.extend_from_slice(checksum.as_bytes());

    Ok(buf)
}

/// Write a single v2 entry.
fn write_entry(buf: &mut Vec<u8>, entry: &IndexEntry) {
    let entry_start = buf.len();

    buf.extend_from_slice(&entry.stat.ctime_secs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.ctime_nsecs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.mtime_secs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.mtime_nsecs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.dev.to_be_bytes());
    buf.extend_from_slice(&entry.stat.ino.to_be_bytes());
    buf.extend_from_slice(&entry.mode.raw().to_be_bytes());
    buf.extend_from_slice(&entry.stat.uid.to_be_bytes());
    buf.extend_from_slice(&entry.stat.gid.to_be_bytes());
    buf.extend_from_slice(&entry.stat.size.to_be_bytes());

    buf.extend_from_slice(entry.oid.as_bytes());

    // Flags: low 12 bits = min(path length, 0xFFF).
    let flags = entry.path.len().min(0x0FFF) as u16;
    buf.extend_from_slice(&flags.to_be_bytes());

    buf.extend_from_slice(&entry.path);

    // NUL terminator plus zero padding to an 8-byte boundary.
    let entry_size = (62 + entry.path.len() + 8) & !7;
    let padding = entry_size - (buf.len() - entry_start);
    buf.extend(std::iter::repeat(0u8).take(padding));
}

/// Build nested tree objects from the index entries bottom-up, writing each
/// sub-tree to the store, and return the root tree OID.
pub fn write_tree_from_index(index: &Index, odb: &ObjectStore) -> Result<ObjectId, IndexError> {
    let entries: Vec<&IndexEntry> = index.iter().collect();
    build_tree(&entries, b"", odb)
}

/// Recursively build tree objects from sorted index entries sharing `prefix`.
fn build_tree(
    entries: &[&IndexEntry],
    prefix: &[u8],
    odb: &ObjectStore,
) -> Result<ObjectId, IndexError> {
    let mut tree_entries: Vec<TreeEntry> = Vec::new();
    let mut i = 0;

    while i < entries.len() {
        let entry = entries[i];
        let rest = &entry.path[prefix.len()..];

        if let Some(slash_pos) = rest.iter().position(|&b| b == b'/') {
            // A sub-tree: gather the run of entries under this directory.
            let dir_name = &rest[..slash_pos];
            let subtree_end = entries[i..]
                .iter()
                .position(|e| {
                    let p = &e.path[prefix.len()..];
                    !(p.len() > slash_pos && &p[..slash_pos] == dir_name && p[slash_pos] == b'/')
                })
                .map(|pos| i + pos)
                .unwrap_or(entries.len());

            let mut sub_prefix = prefix.to_vec();
            sub_prefix.extend_from_slice(dir_name);
            sub_prefix.push(b'/');

            let subtree_oid = build_tree(&entries[i..subtree_end], &sub_prefix, odb)?;

            tree_entries.push(TreeEntry {
                mode: FileMode::Tree,
                name: dir_name.into(),
                oid: subtree_oid,
            });

            i = subtree_end;
        } else {
            tree_entries.push(TreeEntry {
                mode: entry.mode,
                name: rest.into(),
                oid: entry.oid,
            });
            i += 1;
        }
    }

    let tree = Tree {
        entries: tree_entries,
    };
    Ok(odb.write_raw(ObjectType::Tree, &tree.serialize_body())?)
}
