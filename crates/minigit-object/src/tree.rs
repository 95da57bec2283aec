use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use minigit_hash::ObjectId;

use crate::ObjectError;

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Subdirectory (40000)
    Tree,
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))?;
        Self::from_raw(raw)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))
    }

    /// Create from the raw numeric value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Tree),
            _ => None,
        }
    }

    /// Serialize to octal ASCII bytes (no leading zero for trees).
    pub fn as_bytes(&self) -> BString {
        BString::from(format!("{:o}", self.raw()))
    }

    /// Get the raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Tree => 0o40000,
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }

    /// Is this a symlink?
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }
}

/// Parse an octal ASCII string to u32.
fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Compare entries using the canonical tree sorting rule: a sub-tree's
    /// sort key is its name with a trailing `/` appended.
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        sort_key_compare(
            a.name.as_ref(),
            a.mode.is_tree(),
            b.name.as_ref(),
            b.mode.is_tree(),
        )
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::cmp_entries(self, other)
    }
}

/// Compare names with directories getting an implicit trailing '/'.
///
/// After the common prefix, the "next character" of a name that has ended is
/// '/' for a directory and NUL for a file, which makes "foo" (dir) sort
/// after "foo.c" but before "foo0".
fn sort_key_compare(name1: &[u8], is_dir1: bool, name2: &[u8], is_dir2: bool) -> Ordering {
    let min_len = name1.len().min(name2.len());
    let cmp = name1[..min_len].cmp(&name2[..min_len]);
    if cmp != Ordering::Equal {
        return cmp;
    }
    let c1 = if name1.len() > min_len {
        name1[min_len]
    } else if is_dir1 {
        b'/'
    } else {
        0
    };
    let c2 = if name2.len() > min_len {
        name2[min_len]
    } else if is_dir2 {
        b'/'
    } else {
        0
    };
    c1.cmp(&c2)
}

/// A tree object — an immutable directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a tree body from binary format.
    ///
    /// Each entry is: `<mode-octal> <name>\0<raw-20-byte-oid>`.
    pub fn parse(body: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < body.len() {
            let space_pos = body[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode = FileMode::from_bytes(&body[pos..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "invalid mode".into(),
                }
            })?;

            let name_start = space_pos + 1;
            let null_pos = body[name_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let name = BString::from(&body[name_start..null_pos]);

            let oid_start = null_pos + 1;
            if oid_start + 20 > body.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated OID".into(),
                });
            }
            let oid = ObjectId::from_bytes(&body[oid_start..oid_start + 20])?;

            entries.push(TreeEntry { mode, name, oid });
            pos = oid_start + 20;
        }

        Ok(Self { entries })
    }

    /// Serialize the tree body; entries are written in canonical sort order.
    pub fn serialize_body(&self) -> Vec<u8> {
        let mut sorted = self.entries.clone();
        sorted.sort();

        let mut out = Vec::new();
        for entry in &sorted {
            out.extend_from_slice(&entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Sort entries in canonical order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    /// Iterate entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_mode_from_bytes() {
        assert_eq!(FileMode::from_bytes(b"100644").unwrap(), FileMode::Regular);
        assert_eq!(FileMode::from_bytes(b"100755").unwrap(), FileMode::Executable);
        assert_eq!(FileMode::from_bytes(b"120000").unwrap(), FileMode::Symlink);
        assert_eq!(FileMode::from_bytes(b"40000").unwrap(), FileMode::Tree);
        assert!(FileMode::from_bytes(b"160000").is_err());
        assert!(FileMode::from_bytes(b"abc").is_err());
    }

    #[test]
    fn file_mode_roundtrip() {
        for mode in [
            FileMode::Regular,
            FileMode::Executable,
            FileMode::Symlink,
            FileMode::Tree,
        ] {
            assert_eq!(FileMode::from_bytes(&mode.as_bytes()).unwrap(), mode);
        }
    }

    #[test]
    fn tree_mode_has_no_leading_zero() {
        assert_eq!(FileMode::Tree.as_bytes(), BString::from("40000"));
    }

    #[test]
    fn dir_sorts_after_dotted_file() {
        // "foo" (dir) sorts as "foo/"; '/' (0x2F) > '.' (0x2E).
        let dir = TreeEntry {
            mode: FileMode::Tree,
            name: BString::from("foo"),
            oid: ObjectId::NULL,
        };
        let file = TreeEntry {
            mode: FileMode::Regular,
            name: BString::from("foo.c"),
            oid: ObjectId::NULL,
        };
        assert_eq!(TreeEntry::cmp_entries(&dir, &file), Ordering::Greater);
    }

    #[test]
    fn dir_sorts_after_hyphenated_file() {
        let dir = TreeEntry {
            mode: FileMode::Tree,
            name: BString::from("foo"),
            oid: ObjectId::NULL,
        };
        let file = TreeEntry {
            mode: FileMode::Regular,
            name: BString::from("foo-bar"),
            oid: ObjectId::NULL,
        };
        assert_eq!(TreeEntry::cmp_entries(&dir, &file), Ordering::Greater);
    }

    #[test]
    fn same_name_file_before_dir() {
        let file = TreeEntry {
            mode: FileMode::Regular,
            name: BString::from("foo"),
            oid: ObjectId::NULL,
        };
        let dir = TreeEntry {
            mode: FileMode::Tree,
            name: BString::from("foo"),
            oid: ObjectId::NULL,
        };
        assert_eq!(TreeEntry::cmp_entries(&file, &dir), Ordering::Less);
    }

    #[test]
    fn parse_empty_tree() {
        assert!(Tree::parse(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_single_entry() {
        let oid = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 hello.txt\0");
        data.extend_from_slice(oid.as_bytes());

        let tree = Tree::parse(&data).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.entries[0].mode, FileMode::Regular);
        assert_eq!(tree.entries[0].name, "hello.txt");
        assert_eq!(tree.entries[0].oid, oid);
    }

    #[test]
    fn serialize_sorts_entries() {
        let oid = ObjectId::NULL;
        let tree = Tree {
            entries: vec![
                TreeEntry {
                    mode: FileMode::Regular,
                    name: BString::from("b.txt"),
                    oid,
                },
                TreeEntry {
                    mode: FileMode::Tree,
                    name: BString::from("a-dir"),
                    oid,
                },
            ],
        };

        let parsed = Tree::parse(&tree.serialize_body()).unwrap();
        assert_eq!(parsed.entries[0].name, "a-dir");
        assert_eq!(parsed.entries[1].name, "b.txt");
    }

    #[test]
    fn truncated_oid_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 a\0");
        data.extend_from_slice(&[0u8; 10]);
        assert!(Tree::parse(&data).is_err());
    }

    #[test]
    fn find_entry() {
        let tree = Tree {
            entries: vec![TreeEntry {
                mode: FileMode::Regular,
                name: BString::from("README.md"),
                oid: ObjectId::NULL,
            }],
        };
        assert!(tree.find(BStr::new("README.md")).is_some());
        assert!(tree.find(BStr::new("missing")).is_none());
    }
}
