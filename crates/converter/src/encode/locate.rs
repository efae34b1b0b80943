//! Encoder discovery and capability probing
//!
//! Resolves which encoder binary to run (a bundled copy first, then the bare
//! command on the system search path) and queries it for its version and for
//! hardware encoder support.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};
use vidconv_config::EncoderConfig;

/// Version string reported when the encoder cannot be queried
pub const UNKNOWN_VERSION: &str = "unknown";

/// Where a resolved encoder came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderSource {
    /// Binary shipped next to the tool
    Bundled,
    /// Bare command resolved through the system search path
    System,
}

/// A resolved encoder program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderHandle {
    /// Path or bare command name passed to `Command::new`
    pub program: PathBuf,
    pub source: EncoderSource,
}

/// Resolve the encoder relative to the working directory.
///
/// See [`locate_from`].
pub fn locate(config: &EncoderConfig) -> Option<EncoderHandle> {
    locate_from(Path::new(""), config)
}

/// Resolve the encoder, looking for the bundled copy under `base_dir`.
///
/// Resolution order:
/// 1. `<base_dir>/<bundled_dir>/<command><EXE_SUFFIX>` if it is a file
/// 2. `<command>` if `<command> -version` exits successfully
///
/// Returns `None` when neither is usable.
pub fn locate_from(base_dir: &Path, config: &EncoderConfig) -> Option<EncoderHandle> {
    let bundled = base_dir.join(config.bundled_path());
    if bundled.is_file() {
        debug!("Using bundled encoder at {}", bundled.display());
        return Some(EncoderHandle {
            program: bundled,
            source: EncoderSource::Bundled,
        });
    }

    if command_responds(OsStr::new(&config.command)) {
        debug!("Using encoder '{}' from the system path", config.command);
        return Some(EncoderHandle {
            program: PathBuf::from(&config.command),
            source: EncoderSource::System,
        });
    }

    debug!(
        "No encoder at {} and '{}' is not runnable",
        bundled.display(),
        config.command
    );
    None
}

fn command_responds(program: &OsStr) -> bool {
    Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run `<program> -version` and return the first line of its output.
///
/// Never fails: spawn errors, a non-zero exit or empty output all yield
/// [`UNKNOWN_VERSION`].
pub fn query_version(program: &Path) -> String {
    let output = match Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Error retrieving encoder version: {}", e);
            return UNKNOWN_VERSION.to_string();
        }
    };

    if !output.status.success() {
        warn!("'{} -version' exited with {}", program.display(), output.status);
        return UNKNOWN_VERSION.to_string();
    }

    first_line(&String::from_utf8_lossy(&output.stdout))
        .unwrap_or(UNKNOWN_VERSION)
        .to_string()
}

fn first_line(output: &str) -> Option<&str> {
    output
        .lines()
        .next()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

/// Run `<program> -encoders` and check whether `codec` is listed.
///
/// Any failure to run the check is logged and reported as "not available".
pub fn check_hardware_encoder(program: &Path, codec: &str) -> bool {
    match Command::new(program)
        .arg("-encoders")
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => lists_encoder(&String::from_utf8_lossy(&output.stdout), codec),
        Err(e) => {
            warn!("Error checking {} availability: {}", codec, e);
            false
        }
    }
}

/// Check whether an `-encoders` listing mentions `codec` anywhere.
pub fn lists_encoder(listing: &str, codec: &str) -> bool {
    !codec.is_empty() && listing.contains(codec)
}
