//! ffmpeg encoder module for vidconv
//!
//! Builds and executes the ffmpeg command lines for resolution conversion and
//! audio extraction.

use super::locate::{check_hardware_encoder, query_version, EncoderHandle};
use super::{ConversionRequest, EncodeError, Encoder, ExtractionRequest};
use std::cell::OnceCell;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Audio codec that needs ffmpeg's experimental mode enabled
const AAC: &str = "aac";

/// [`Encoder`] backed by an ffmpeg binary
///
/// The version string and hardware check are run at most once and cached.
#[derive(Debug)]
pub struct FfmpegEncoder {
    handle: EncoderHandle,
    hardware_codec: String,
    version: OnceCell<String>,
    hardware: OnceCell<bool>,
}

impl FfmpegEncoder {
    /// Wrap a located encoder. `hardware_codec` is the encoder name looked for
    /// by [`Encoder::supports_hardware_encode`].
    pub fn new(handle: EncoderHandle, hardware_codec: impl Into<String>) -> Self {
        Self {
            handle,
            hardware_codec: hardware_codec.into(),
            version: OnceCell::new(),
            hardware: OnceCell::new(),
        }
    }
}

impl Encoder for FfmpegEncoder {
    fn version(&self) -> String {
        self.version
            .get_or_init(|| query_version(&self.handle.program))
            .clone()
    }

    fn supports_hardware_encode(&self) -> bool {
        *self
            .hardware
            .get_or_init(|| check_hardware_encoder(&self.handle.program, &self.hardware_codec))
    }

    fn run_conversion(&self, request: &ConversionRequest<'_>) -> Result<(), EncodeError> {
        execute(build_conversion_command(&self.handle.program, request))
    }

    fn run_extraction(&self, request: &ExtractionRequest<'_>) -> Result<(), EncodeError> {
        execute(build_extraction_command(&self.handle.program, request))
    }
}

/// Build an ffmpeg command that rescales a video
///
/// Creates a Command configured with:
/// - Overwrite of an existing output file
/// - Scaling to the requested height, width derived from the aspect ratio
/// - The requested video and audio codecs
/// - `-strict experimental` when the audio codec is AAC
pub fn build_conversion_command(program: &Path, request: &ConversionRequest<'_>) -> Command {
    let mut cmd = Command::new(program);

    cmd.arg("-y");
    cmd.arg("-i").arg(request.input);

    cmd.arg("-vf").arg(format!("scale=-1:{}", request.height));
    cmd.arg("-c:v").arg(request.video_codec);
    cmd.arg("-c:a").arg(request.audio_codec);

    if request.audio_codec == AAC {
        cmd.arg("-strict").arg("experimental");
    }

    cmd.arg(request.output);

    cmd
}

/// Build an ffmpeg command that extracts the audio track
///
/// Creates a Command configured with:
/// - Overwrite of an existing output file
/// - No video stream
/// - The requested audio codec at a constant bitrate
pub fn build_extraction_command(program: &Path, request: &ExtractionRequest<'_>) -> Command {
    let mut cmd = Command::new(program);

    cmd.arg("-y");
    cmd.arg("-i").arg(request.input);
    cmd.arg("-vn");
    cmd.arg("-c:a").arg(request.audio_codec);
    cmd.arg("-b:a").arg(request.audio_bitrate);
    cmd.arg(request.output);

    cmd
}

/// Run a built command to completion with its output captured and discarded.
///
/// # Errors
/// Returns an error if:
/// - The process fails to start (IO error)
/// - The process exits with non-zero status
/// - The process is terminated by a signal
fn execute(mut cmd: Command) -> Result<(), EncodeError> {
    debug!("Running {:?}", cmd);

    let output = cmd.stdin(Stdio::null()).output()?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if let Some(last) = stderr.lines().rev().find(|line| !line.trim().is_empty()) {
        warn!("encoder reported: {}", last.trim());
    }

    match output.status.code() {
        Some(code) => Err(EncodeError::EncoderFailed(code)),
        None => Err(EncodeError::EncoderTerminated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::EncoderSource;
    use proptest::prelude::*;
    use std::ffi::OsStr;
    use std::num::NonZeroU32;
    use std::path::PathBuf;

    /// Helper to convert Command args to a Vec of strings for easier testing
    fn get_command_args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .filter_map(|arg| arg.to_str().map(String::from))
            .collect()
    }

    /// Helper to check if args contain a flag with a specific value
    fn has_flag_with_value(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|pair| pair[0] == flag && pair[1] == value)
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z0-9_/.-]{1,50}").unwrap()
    }

    fn missing_encoder() -> FfmpegEncoder {
        FfmpegEncoder::new(
            EncoderHandle {
                program: PathBuf::from("nonexistent_encoder_12345"),
                source: EncoderSource::System,
            },
            "h264_nvenc",
        )
    }

    #[test]
    fn test_conversion_command_exact_args() {
        let request = ConversionRequest {
            input: Path::new("in/clip.mp4"),
            output: Path::new("out/clip_480p.mp4"),
            height: NonZeroU32::new(480).unwrap(),
            video_codec: "libx264",
            audio_codec: "aac",
        };
        let cmd = build_conversion_command(Path::new("bin/ffmpeg"), &request);

        assert_eq!(cmd.get_program(), OsStr::new("bin/ffmpeg"));
        assert_eq!(
            get_command_args(&cmd),
            vec![
                "-y", "-i", "in/clip.mp4", "-vf", "scale=-1:480", "-c:v", "libx264", "-c:a",
                "aac", "-strict", "experimental", "out/clip_480p.mp4",
            ]
        );
    }

    #[test]
    fn test_conversion_command_without_aac_has_no_strict_flag() {
        let request = ConversionRequest {
            input: Path::new("a.mkv"),
            output: Path::new("b.mkv"),
            height: NonZeroU32::new(720).unwrap(),
            video_codec: "h264_nvenc",
            audio_codec: "libopus",
        };
        let args = get_command_args(&build_conversion_command(Path::new("ffmpeg"), &request));

        assert!(!args.iter().any(|arg| arg == "-strict"));
        assert!(has_flag_with_value(&args, "-c:v", "h264_nvenc"));
        assert_eq!(args.last().map(String::as_str), Some("b.mkv"));
    }

    #[test]
    fn test_extraction_command_exact_args() {
        let request = ExtractionRequest {
            input: Path::new("in/sub/clip.mkv"),
            output: Path::new("out/sub/clip.mp3"),
            audio_codec: "mp3",
            audio_bitrate: "192k",
        };
        let cmd = build_extraction_command(Path::new("ffmpeg"), &request);

        assert_eq!(cmd.get_program(), OsStr::new("ffmpeg"));
        assert_eq!(
            get_command_args(&cmd),
            vec![
                "-y", "-i", "in/sub/clip.mkv", "-vn", "-c:a", "mp3", "-b:a", "192k",
                "out/sub/clip.mp3",
            ]
        );
    }

    #[test]
    fn test_missing_encoder_degrades() {
        let encoder = missing_encoder();
        assert_eq!(encoder.version(), crate::encode::UNKNOWN_VERSION);
        assert!(!encoder.supports_hardware_encode());
    }

    #[test]
    fn test_missing_encoder_run_is_io_error() {
        let encoder = missing_encoder();
        let request = ExtractionRequest {
            input: Path::new("a.mp4"),
            output: Path::new("a.mp3"),
            audio_codec: "mp3",
            audio_bitrate: "192k",
        };
        assert!(matches!(
            encoder.run_extraction(&request),
            Err(EncodeError::Io(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_conversion_command_completeness(
            input_path in path_strategy(),
            output_path in path_strategy(),
            height in 1u32..8640,
            hardware in proptest::bool::ANY,
        ) {
            let video_codec = if hardware { "h264_nvenc" } else { "libx264" };
            let request = ConversionRequest {
                input: Path::new(&input_path),
                output: Path::new(&output_path),
                height: NonZeroU32::new(height).unwrap(),
                video_codec,
                audio_codec: "aac",
            };

            let cmd = build_conversion_command(Path::new("ffmpeg"), &request);
            let args = get_command_args(&cmd);

            prop_assert_eq!(args.first().map(String::as_str), Some("-y"));
            prop_assert!(has_flag_with_value(&args, "-i", &input_path));
            prop_assert!(
                has_flag_with_value(&args, "-vf", &format!("scale=-1:{}", height)),
                "Command should scale to height {}, args: {:?}", height, args
            );
            prop_assert!(has_flag_with_value(&args, "-c:v", video_codec));
            prop_assert!(has_flag_with_value(&args, "-c:a", "aac"));
            prop_assert!(has_flag_with_value(&args, "-strict", "experimental"));
            // output path is always the final argument
            prop_assert_eq!(args.last(), Some(&output_path));
        }
    }
}
