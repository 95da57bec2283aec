use std::fs;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use minigit_hash::ObjectId;
use minigit_utils::tempfile::write_atomic;

use crate::name::RefName;
use crate::{RefError, Reference};

/// Read a loose ref file: either a hex OID or `ref: <target>`.
pub(crate) fn read_loose_ref(
    minigit_dir: &Path,
    name: &RefName,
) -> Result<Option<Reference>, RefError> {
    let path = loose_ref_path(minigit_dir, name);
    let contents = match fs::read(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(RefError::IoPath {
                path,
                source: e,
            })
        }
    };

    let trimmed = contents.trim();

    if let Some(target_bytes) = trimmed.strip_prefix(b"ref: ") {
        let target_str = std::str::from_utf8(target_bytes.trim())
            .map_err(|_| RefError::Parse("invalid UTF-8 in symbolic ref target".into()))?;
        let target = RefName::new(target_str)?;
        Ok(Some(Reference::Symbolic {
            name: name.clone(),
            target,
        }))
    } else {
        let hex = std::str::from_utf8(trimmed)
            .map_err(|_| RefError::Parse("invalid UTF-8 in ref OID".into()))?;
        let oid = ObjectId::from_hex(hex)?;
        Ok(Some(Reference::Direct {
            name: name.clone(),
            target: oid,
        }))
    }
}

/// Write a direct ref atomically, creating parent directories.
pub(crate) fn write_loose_ref(
    minigit_dir: &Path,
    name: &RefName,
    oid: &ObjectId,
) -> Result<(), RefError> {
    let path = loose_ref_path(minigit_dir, name);
    write_atomic(&path, format!("{}\n", oid.to_hex()).as_bytes())?;
    Ok(())
}

/// Write a symbolic ref atomically: `ref: <target>\n`.
pub(crate) fn write_symbolic_ref(
    minigit_dir: &Path,
    name: &RefName,
    target: &RefName,
) -> Result<(), RefError> {
    let path = loose_ref_path(minigit_dir, name);
    write_atomic(&path, format!("ref: {}\n", target).as_bytes())?;
    Ok(())
}

/// Delete a loose ref file and prune now-empty parent directories, stopping
/// at `refs/heads` and `refs/tags`.
pub(crate) fn delete_loose_ref(minigit_dir: &Path, name: &RefName) -> Result<(), RefError> {
    let path = loose_ref_path(minigit_dir, name);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| RefError::IoPath {
            path: path.clone(),
            source: e,
        })?;

        let heads = minigit_dir.join("refs").join("heads");
        let tags = minigit_dir.join("refs").join("tags");
        let mut dir = path.parent().map(|p| p.to_path_buf());
        while let Some(d) = dir {
            if d == heads || d == tags || !d.starts_with(minigit_dir) {
                break;
            }
            let is_empty = d
                .read_dir()
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                break;
            }
            let _ = fs::remove_dir(&d);
            dir = d.parent().map(|p| p.to_path_buf());
        }
    }
    Ok(())
}

/// Enumerate loose refs under a prefix directory (e.g. `refs/heads`),
/// returning full ref names sorted byte-wise.
pub(crate) fn enumerate_loose_refs(
    minigit_dir: &Path,
    prefix: &str,
) -> Result<Vec<RefName>, RefError> {
    let search_dir = minigit_dir.join(prefix);
    let mut result = Vec::new();
    if search_dir.is_dir() {
        collect_refs_recursive(minigit_dir, &search_dir, &mut result)?;
    }
    result.sort();
    Ok(result)
}

fn collect_refs_recursive(
    minigit_dir: &Path,
    dir: &Path,
    result: &mut Vec<RefName>,
) -> Result<(), RefError> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(RefError::IoPath {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| RefError::IoPath {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_refs_recursive(minigit_dir, &path, result)?;
        } else if path.is_file() {
            let rel = path
                .strip_prefix(minigit_dir)
                .map_err(|_| RefError::Parse("ref path outside repository".into()))?;
            let Some(name_str) = rel.to_str() else {
                continue;
            };
            let name_str = if cfg!(windows) {
                name_str.replace('\\', "/")
            } else {
                name_str.to_string()
            };
            if let Ok(name) = RefName::new(name_str) {
                result.push(name);
            }
        }
    }

    Ok(())
}

/// File system path for a loose ref.
pub(crate) fn loose_ref_path(minigit_dir: &Path, name: &RefName) -> PathBuf {
    let mut path = minigit_dir.to_path_buf();
    for comp in name.as_str().split('/') {
        path.push(comp);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const OID_HEX: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn read_direct_ref() {
        let dir = tempfile::tempdir().unwrap();
        let refs_dir = dir.path().join("refs/heads");
        fs::create_dir_all(&refs_dir).unwrap();
        fs::write(refs_dir.join("main"), format!("{OID_HEX}\n")).unwrap();

        let name = RefName::new("refs/heads/main").unwrap();
        let reference = read_loose_ref(dir.path(), &name).unwrap().unwrap();
        assert_eq!(
            reference.target_oid().unwrap(),
            ObjectId::from_hex(OID_HEX).unwrap()
        );
    }

    #[test]
    fn read_symbolic_ref() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();

        let name = RefName::new("HEAD").unwrap();
        let reference = read_loose_ref(dir.path(), &name).unwrap().unwrap();
        assert_eq!(
            reference.symbolic_target().unwrap().as_str(),
            "refs/heads/main"
        );
    }

    #[test]
    fn read_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let name = RefName::new("refs/heads/missing").unwrap();
        assert!(read_loose_ref(dir.path(), &name).unwrap().is_none());
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let name = RefName::new("refs/heads/main").unwrap();
        let oid = ObjectId::from_hex(OID_HEX).unwrap();

        write_loose_ref(dir.path(), &name, &oid).unwrap();

        let contents = fs::read_to_string(dir.path().join("refs/heads/main")).unwrap();
        assert_eq!(contents, format!("{OID_HEX}\n"));

        let reference = read_loose_ref(dir.path(), &name).unwrap().unwrap();
        assert_eq!(reference.target_oid().unwrap(), oid);
    }

    #[test]
    fn delete_prunes_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let name = RefName::new("refs/heads/feature/deep/topic").unwrap();
        let oid = ObjectId::from_hex(OID_HEX).unwrap();
        write_loose_ref(dir.path(), &name, &oid).unwrap();

        delete_loose_ref(dir.path(), &name).unwrap();

        assert!(!dir.path().join("refs/heads/feature").exists());
        assert!(dir.path().join("refs/heads").exists());
    }

    #[test]
    fn enumerate_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let oid = ObjectId::from_hex(OID_HEX).unwrap();
        for n in ["refs/heads/zeta", "refs/heads/alpha", "refs/heads/nested/one"] {
            write_loose_ref(dir.path(), &RefName::new(n).unwrap(), &oid).unwrap();
        }

        let names = enumerate_loose_refs(dir.path(), "refs/heads").unwrap();
        let strs: Vec<_> = names.iter().map(|n| n.as_str().to_string()).collect();
        assert_eq!(
            strs,
            vec![
                "refs/heads/alpha",
                "refs/heads/nested/one",
                "refs/heads/zeta"
            ]
        );
    }
}
