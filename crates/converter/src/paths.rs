//! Output path derivation.
//!
//! Maps an input file under the input root to its counterpart under the
//! output root, keeping the relative directory structure and renaming the
//! file for the run mode. Pure path computation, no filesystem access.

use std::ffi::OsString;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while deriving an output path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The input does not live under the input root.
    #[error("{} is not inside {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// The input has no file name component (e.g. it is the root itself).
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// How the output file is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    /// `{stem}_{height}p{original extension}`
    Resolution { height: NonZeroU32 },
    /// `{stem}.{extension}`, the original extension dropped
    Audio { extension: String },
}

/// Derives the output path for `input`.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU32;
/// use std::path::{Path, PathBuf};
/// use vidconv::paths::{derive_output_path, OutputKind};
///
/// let kind = OutputKind::Resolution { height: NonZeroU32::new(480).unwrap() };
/// let out = derive_output_path(Path::new("in/a/b/c.mp4"), Path::new("in"), Path::new("out"), &kind);
/// assert_eq!(out, Ok(PathBuf::from("out/a/b/c_480p.mp4")));
/// ```
pub fn derive_output_path(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    kind: &OutputKind,
) -> Result<PathBuf, PathError> {
    let relative = input
        .strip_prefix(input_root)
        .map_err(|_| PathError::OutsideRoot {
            path: input.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;

    let stem = relative
        .file_stem()
        .ok_or_else(|| PathError::NoFileName(input.to_path_buf()))?;

    let mut file_name = OsString::from(stem);
    match kind {
        OutputKind::Resolution { height } => {
            file_name.push(format!("_{}p", height));
            if let Some(ext) = relative.extension() {
                file_name.push(".");
                file_name.push(ext);
            }
        }
        OutputKind::Audio { extension } => {
            file_name.push(".");
            file_name.push(extension);
        }
    }

    let dir = match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => output_root.join(parent),
        _ => output_root.to_path_buf(),
    };

    Ok(dir.join(file_name))
}
