use std::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::RefError;

/// A validated reference name (a `/`-separated relative path inside the
/// repository metadata directory).
///
/// Enforced rules:
/// - no NUL, control characters, space, or any of `~^:?*[\`
/// - no leading or trailing `/`, no `//`
/// - no component starting with `.`, no `..`
/// - no trailing `.` and no trailing `.lock`
/// - no `@{` sequence, not the single character `@`
/// - must contain a `/` unless it is a special ref such as `HEAD`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(BString);

/// Characters forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[u8] = b" ~^:?*[\\";

/// Special refs that are valid without a `/`.
const SPECIAL_REFS: &[&str] = &["HEAD", "MERGE_HEAD", "ORIG_HEAD"];

impl RefName {
    /// Create and validate a ref name.
    pub fn new(name: impl Into<BString>) -> Result<Self, RefError> {
        let name = name.into();
        validate_ref_name(&name)?;
        Ok(Self(name))
    }

    /// The branch ref for a short branch name.
    pub fn branch(short: &str) -> Result<Self, RefError> {
        validate_branch_name(short)?;
        Self::new(format!("refs/heads/{short}"))
    }

    /// The tag ref for a short tag name.
    pub fn tag(short: &str) -> Result<Self, RefError> {
        validate_branch_name(short)?;
        Self::new(format!("refs/tags/{short}"))
    }

    /// Get the short name (e.g., `main` from `refs/heads/main`).
    pub fn short_name(&self) -> &BStr {
        let s = self.0.as_bstr();
        if let Some(rest) = s.strip_prefix(b"refs/heads/") {
            rest.as_bstr()
        } else if let Some(rest) = s.strip_prefix(b"refs/tags/") {
            rest.as_bstr()
        } else {
            s
        }
    }

    /// Is this under `refs/heads/`?
    pub fn is_branch(&self) -> bool {
        self.0.starts_with(b"refs/heads/")
    }

    /// Is this under `refs/tags/`?
    pub fn is_tag(&self) -> bool {
        self.0.starts_with(b"refs/tags/")
    }

    /// Get as a string slice (validation guarantees ASCII-safe names).
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("<invalid-utf8>")
    }

    /// Get the raw bytes of this ref name.
    pub fn as_bstr(&self) -> &BStr {
        self.0.as_bstr()
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a branch or tag short name (one path component or more) for
/// creation. On top of the general ref-name rules, a leading `-` is
/// rejected.
pub fn validate_branch_name(name: &str) -> Result<(), RefError> {
    if name.is_empty() {
        return Err(RefError::InvalidName("name is empty".into()));
    }
    if name.starts_with('-') {
        return Err(RefError::InvalidName(format!("'{name}': starts with '-'")));
    }
    validate_ref_name(format!("refs/heads/{name}").as_bytes())?;
    Ok(())
}

/// Validate a full ref name.
fn validate_ref_name(name: &[u8]) -> Result<(), RefError> {
    let name_str = || String::from_utf8_lossy(name).into_owned();

    if name.is_empty() {
        return Err(RefError::InvalidName("ref name is empty".into()));
    }
    if name == b"@" {
        return Err(RefError::InvalidName("'@' is not a valid ref name".into()));
    }
    if name.contains(&0) {
        return Err(RefError::InvalidName(format!(
            "'{}': contains NUL byte",
            name_str()
        )));
    }

    for &b in name {
        if b < 0x20 || b == 0x7f {
            return Err(RefError::InvalidName(format!(
                "'{}': contains control character",
                name_str()
            )));
        }
        if FORBIDDEN_CHARS.contains(&b) {
            return Err(RefError::InvalidName(format!(
                "'{}': contains forbidden character '{}'",
                name_str(),
                b as char
            )));
        }
    }

    if name.starts_with(b"/") || name.ends_with(b"/") {
        return Err(RefError::InvalidName(format!(
            "'{}': begins or ends with '/'",
            name_str()
        )));
    }
    if name.find(b"//").is_some() {
        return Err(RefError::InvalidName(format!(
            "'{}': contains '//'",
            name_str()
        )));
    }
    if name.find(b"..").is_some() {
        return Err(RefError::InvalidName(format!(
            "'{}': contains '..'",
            name_str()
        )));
    }
    if name.find(b"@{").is_some() {
        return Err(RefError::InvalidName(format!(
            "'{}': contains '@{{'",
            name_str()
        )));
    }
    if name.ends_with(b".") {
        return Err(RefError::InvalidName(format!(
            "'{}': ends with '.'",
            name_str()
        )));
    }

    for component in name.split_str("/") {
        if component.starts_with(b".") {
            return Err(RefError::InvalidName(format!(
                "'{}': component starts with '.'",
                name_str()
            )));
        }
        if component.ends_with(b".lock") {
            return Err(RefError::InvalidName(format!(
                "'{}': component ends with '.lock'",
                name_str()
            )));
        }
    }

    // Full refs need a '/', special refs are exempt.
    if !name.contains(&b'/') {
        let s = String::from_utf8_lossy(name);
        if !SPECIAL_REFS.contains(&s.as_ref()) {
            return Err(RefError::InvalidName(format!(
                "'{}': one-level ref outside the special set",
                name_str()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_refs() {
        assert!(RefName::new("refs/heads/main").is_ok());
        assert!(RefName::new("refs/tags/v1.0").is_ok());
        assert!(RefName::new("refs/heads/feature/sub").is_ok());
        assert!(RefName::new("HEAD").is_ok());
        assert!(RefName::new("MERGE_HEAD").is_ok());
        assert!(RefName::new("ORIG_HEAD").is_ok());
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(RefName::new("refs/heads/with space").is_err());
        assert!(RefName::new("refs/heads/ca^ret").is_err());
        assert!(RefName::new("refs/heads/co:lon").is_err());
        assert!(RefName::new("refs/heads/gl*b").is_err());
        assert!(RefName::new("refs/heads/back\\slash").is_err());
        assert!(RefName::new("refs/heads/que?stion").is_err());
        assert!(RefName::new("refs/heads/br[acket").is_err());
        assert!(RefName::new("refs/heads/til~de").is_err());
    }

    #[test]
    fn rejects_structure_violations() {
        assert!(RefName::new("").is_err());
        assert!(RefName::new("@").is_err());
        assert!(RefName::new("/refs/heads/x").is_err());
        assert!(RefName::new("refs/heads/x/").is_err());
        assert!(RefName::new("refs//heads").is_err());
        assert!(RefName::new("refs/heads/a..b").is_err());
        assert!(RefName::new("refs/heads/.hidden").is_err());
        assert!(RefName::new("refs/heads/x.lock").is_err());
        assert!(RefName::new("refs/heads/x.").is_err());
        assert!(RefName::new("refs/heads/a@{b").is_err());
        assert!(RefName::new("standalone").is_err());
    }

    #[test]
    fn branch_names() {
        assert!(validate_branch_name("main").is_ok());
        assert!(validate_branch_name("feature/x").is_ok());
        assert!(validate_branch_name("-leading-dash").is_err());
        assert!(validate_branch_name(".leading-dot").is_err());
        assert!(validate_branch_name("a..b").is_err());
        assert!(validate_branch_name("x.lock").is_err());
        assert!(validate_branch_name("").is_err());
    }

    #[test]
    fn short_name() {
        assert_eq!(RefName::new("refs/heads/main").unwrap().short_name(), "main");
        assert_eq!(RefName::new("refs/tags/v1.0").unwrap().short_name(), "v1.0");
        assert_eq!(RefName::new("HEAD").unwrap().short_name(), "HEAD");
    }

    #[test]
    fn classification() {
        assert!(RefName::new("refs/heads/main").unwrap().is_branch());
        assert!(RefName::new("refs/tags/v1").unwrap().is_tag());
        assert!(!RefName::new("HEAD").unwrap().is_branch());
    }

    #[test]
    fn constructors() {
        assert_eq!(RefName::branch("dev").unwrap().as_str(), "refs/heads/dev");
        assert_eq!(RefName::tag("v2").unwrap().as_str(), "refs/tags/v2");
    }
}
