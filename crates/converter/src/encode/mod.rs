//! Encoding modules for vidconv
//!
//! The [`Encoder`] trait is the seam between the batch logic and the external
//! encoder process; [`FfmpegEncoder`] is the production implementation.

pub mod ffmpeg;
pub mod locate;

pub use ffmpeg::{
    build_conversion_command, build_extraction_command, FfmpegEncoder,
};
pub use locate::{
    locate, locate_from, lists_encoder, check_hardware_encoder, query_version, EncoderHandle,
    EncoderSource, UNKNOWN_VERSION,
};

use std::num::NonZeroU32;
use std::path::Path;
use thiserror::Error;

/// Error type for encoding operations
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Encoder process exited with non-zero status
    #[error("encoder failed with exit code: {0}")]
    EncoderFailed(i32),

    /// Encoder process was terminated by signal
    #[error("encoder process was terminated by signal")]
    EncoderTerminated,

    /// IO error while spawning or waiting on the encoder
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One resolution conversion: scale to `height` and re-encode video and audio.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub height: NonZeroU32,
    pub video_codec: &'a str,
    pub audio_codec: &'a str,
}

/// One audio extraction: drop the video stream and re-encode the audio at a
/// constant bitrate.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub audio_codec: &'a str,
    pub audio_bitrate: &'a str,
}

/// Capabilities the batch runner needs from an external encoder.
pub trait Encoder {
    /// First line of the encoder's version banner, or [`UNKNOWN_VERSION`].
    fn version(&self) -> String;

    /// Whether the GPU video encoder is available. Probe failures count as `false`.
    fn supports_hardware_encode(&self) -> bool;

    /// Run a single resolution conversion to completion.
    fn run_conversion(&self, request: &ConversionRequest<'_>) -> Result<(), EncodeError>;

    /// Run a single audio extraction to completion.
    fn run_extraction(&self, request: &ExtractionRequest<'_>) -> Result<(), EncodeError>;
}
