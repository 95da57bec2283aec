//! Repository-relative path handling.
//!
//! All paths stored in trees and the index are `/`-separated byte strings
//! relative to the worktree root. Host-platform separators are translated on
//! input; absolute paths and parent-escaping components are refused.

use std::path::{Path, PathBuf};

use bstr::{BStr, BString, ByteSlice};

use crate::error::UtilError;
use crate::Result;

/// Normalize a user-supplied worktree-relative path into canonical repo form.
///
/// Rejects absolute paths, `..` components, and empty results; strips `.`
/// components and redundant slashes; converts `\` to `/` on Windows.
pub fn normalize(input: &str) -> Result<BString> {
    let input = if cfg!(windows) {
        input.replace('\\', "/")
    } else {
        input.to_string()
    };

    if input.starts_with('/') || has_drive_prefix(&input) {
        return Err(UtilError::Path(format!("'{}': absolute paths are not allowed", input)));
    }

    let mut components: Vec<&str> = Vec::new();
    for comp in input.split('/') {
        match comp {
            "" | "." => continue,
            ".." => {
                return Err(UtilError::Path(format!(
                    "'{}': path escapes the worktree",
                    input
                )));
            }
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return Err(UtilError::Path(format!("'{}': empty path", input)));
    }

    Ok(BString::from(components.join("/")))
}

/// Join a canonical repo path onto a platform root directory.
pub fn to_platform(root: &Path, repo_path: &BStr) -> PathBuf {
    let mut out = root.to_path_buf();
    for comp in repo_path.split_str("/") {
        out.push(comp.to_str_lossy().as_ref());
    }
    out
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_plain() {
        assert_eq!(normalize("a/b/c.txt").unwrap(), "a/b/c.txt");
    }

    #[test]
    fn normalize_strips_dot_and_doubled_slashes() {
        assert_eq!(normalize("./a//b/./c").unwrap(), "a/b/c");
    }

    #[test]
    fn normalize_rejects_absolute() {
        assert!(normalize("/etc/passwd").is_err());
    }

    #[test]
    fn normalize_rejects_parent_escape() {
        assert!(normalize("a/../../b").is_err());
        assert!(normalize("..").is_err());
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(normalize("").is_err());
        assert!(normalize("./").is_err());
    }

    #[test]
    fn to_platform_joins_components() {
        let p = to_platform(Path::new("/work"), BStr::new("a/b.txt"));
        assert_eq!(p, PathBuf::from("/work/a/b.txt"));
    }
}
