use std::path::{Path, PathBuf};

/// Checks that `path` names an existing regular file.
pub fn existing_file(path: &Path) -> Result<PathBuf, String> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(format!("File '{}' does not exist", path.display()))
    }
}
