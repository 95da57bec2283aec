use std::fs;
use std::path::{Path, PathBuf};

use crate::{RepoError, MINIGIT_DIR};

/// Initialize the `.minigit/` scaffold inside `path`:
/// - `HEAD` (pointing at `refs/heads/main`)
/// - `config`
/// - `objects/info/`, `objects/pack/`
/// - `refs/heads/`, `refs/tags/`
///
/// Re-running on an existing repository leaves it untouched.
pub fn init_repository(path: &Path) -> Result<PathBuf, RepoError> {
    let work_tree = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };
    let minigit_dir = work_tree.join(MINIGIT_DIR);

    if minigit_dir.join("HEAD").is_file() {
        return Ok(work_tree);
    }

    fs::create_dir_all(minigit_dir.join("objects").join("info"))?;
    fs::create_dir_all(minigit_dir.join("objects").join("pack"))?;
    fs::create_dir_all(minigit_dir.join("refs").join("heads"))?;
    fs::create_dir_all(minigit_dir.join("refs").join("tags"))?;

    fs::write(minigit_dir.join("HEAD"), "ref: refs/heads/main\n")?;
    fs::write(
        minigit_dir.join("config"),
        "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n",
    )?;

    Ok(work_tree)
}
