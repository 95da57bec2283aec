//! Atomic file replacement.
//!
//! Every mutable on-disk structure (index, refs, merge state) is replaced by
//! writing a uniquely named sibling temp file and renaming it over the
//! target; rename is the atomic commit point.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::UtilError;
use crate::Result;

/// A temporary file created in the target's directory so the final rename
/// stays within one filesystem. Deleted on drop unless persisted.
pub struct TempFile {
    inner: Option<::tempfile::NamedTempFile>,
}

impl TempFile {
    /// Create a new temporary file in the given directory.
    pub fn new_in(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let named = ::tempfile::NamedTempFile::new_in(dir)?;
        Ok(Self { inner: Some(named) })
    }

    /// Create a new temporary file alongside the given target path.
    pub fn new_for(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        let dir = target.parent().unwrap_or(Path::new("."));
        Self::new_in(dir)
    }

    /// Get the path of the temporary file.
    pub fn path(&self) -> &Path {
        self.inner
            .as_ref()
            .map(|n| n.path())
            .unwrap_or(Path::new(""))
    }

    /// Flush, sync, and rename over the target. Consumes the TempFile.
    pub fn persist(mut self, target: impl AsRef<Path>) -> Result<()> {
        if let Some(mut named) = self.inner.take() {
            named.flush()?;
            named.as_file().sync_all()?;
            named
                .persist(target.as_ref())
                .map_err(|e| UtilError::Io(e.error))?;
        }
        Ok(())
    }
}

impl Write for TempFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("temp file already persisted"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("temp file already persisted"))?
            .flush()
    }
}

/// Replace `target` with `contents` atomically.
pub fn write_atomic(target: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let target = target.as_ref();
    let mut tmp = TempFile::new_for(target)?;
    tmp.write_all(contents)?;
    tmp.persist(target)
}
