use bstr::BString;

/// A blob object: opaque bytes, either file content or a symlink target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: BString,
}

impl Blob {
    pub fn new(data: impl Into<BString>) -> Self {
        Self { data: data.into() }
    }

    /// Blobs carry no structure; the body is the data.
    pub fn parse(body: &[u8]) -> Self {
        Self {
            data: BString::from(body),
        }
    }

    /// Does the content look binary? (contains a NUL byte)
    pub fn is_binary(&self) -> bool {
        self.data.contains(&0)
    }
}
