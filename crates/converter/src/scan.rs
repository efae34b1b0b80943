//! Scanner module for discovering video files under the input root.
//!
//! Recursively walks the input root and keeps every regular file whose
//! extension is on the configured whitelist.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Checks if a file has one of `extensions` (case-insensitive).
///
/// `extensions` carry their leading dot, e.g. `".mp4"`.
pub fn is_video_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = format!(".{}", ext.to_lowercase());
            extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext_lower))
        })
        .unwrap_or(false)
}

/// Scans `root` for video files at any depth.
///
/// Entries within a directory are visited in file name order, so repeated
/// scans of an unchanged tree return the same sequence. A missing root or
/// unreadable subdirectory yields fewer results, never an error.
pub fn discover(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // Only process files; a symlink counts when its target is a file.
        // Directory symlinks are never descended into.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        if is_video_file(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} input files under {}", files.len(), root.display());
    files
}
