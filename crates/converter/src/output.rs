//! Output area management.
//!
//! The output root is wiped and recreated once per batch run, before any file
//! is written; per-file parent directories are created on demand.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Deletes `root` with all of its contents, then recreates it empty.
///
/// Destructive and irreversible. A regular file occupying `root` is removed
/// too. Afterwards `root` is an existing, empty directory whether or not it
/// existed before.
pub fn reset_output_area(root: &Path) -> io::Result<()> {
    match fs::symlink_metadata(root) {
        Ok(metadata) if metadata.is_dir() => {
            debug!("Clearing output folder {}", root.display());
            fs::remove_dir_all(root)?;
        }
        Ok(_) => fs::remove_file(root)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    fs::create_dir_all(root)
}

/// Creates every missing directory above `path`. Idempotent.
pub fn ensure_parent_exists(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
