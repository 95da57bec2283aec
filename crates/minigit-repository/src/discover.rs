use std::path::{Path, PathBuf};

use crate::{RepoError, MINIGIT_DIR};

/// Walk up from `start` until a directory containing `.minigit/HEAD` is
/// found. Returns `(minigit_dir, work_tree)`.
pub fn discover_from(start: &Path) -> Result<(PathBuf, PathBuf), RepoError> {
    let start = if start.is_relative() {
        std::env::current_dir()?.join(start)
    } else {
        start.to_path_buf()
    };

    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        let candidate = dir.join(MINIGIT_DIR);
        if candidate.join("HEAD").is_file() {
            return Ok((candidate, dir.to_path_buf()));
        }
        current = dir.parent();
    }

    Err(RepoError::NotFound(start))
}
