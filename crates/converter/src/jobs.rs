//! Run modes and per-run conversion settings.

use crate::encode::{ConversionRequest, EncodeError, Encoder, ExtractionRequest};
use crate::paths::OutputKind;
use std::num::NonZeroU32;
use std::path::Path;
use vidconv_config::Config;

/// What a batch run does with each input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Re-encode video and audio at a new height
    ResolutionConvert,
    /// Drop the video and re-encode only the audio
    AudioExtract,
}

impl RunMode {
    /// One-line description shown in the banner
    pub fn description(&self) -> &'static str {
        match self {
            RunMode::ResolutionConvert => {
                "Converts videos to the given resolution. Codecs are H264/AAC."
            }
            RunMode::AudioExtract => "Extracts audio from videos. Codec is mp3.",
        }
    }
}

/// Video encoder chosen for a resolution conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoCodec {
    Software(String),
    Hardware(String),
}

impl VideoCodec {
    /// Hardware codec when available, software codec otherwise.
    pub fn select(hardware_available: bool, config: &Config) -> Self {
        if hardware_available {
            VideoCodec::Hardware(config.encoder.hardware_video_codec.clone())
        } else {
            VideoCodec::Software(config.encoder.software_video_codec.clone())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VideoCodec::Software(name) | VideoCodec::Hardware(name) => name,
        }
    }

    pub fn is_hardware(&self) -> bool {
        matches!(self, VideoCodec::Hardware(_))
    }
}

/// Settings shared by every file of one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionSpec {
    Resolution {
        height: NonZeroU32,
        video_codec: VideoCodec,
        audio_codec: String,
    },
    AudioExtract {
        audio_codec: String,
        audio_bitrate: String,
        extension: String,
    },
}

impl ConversionSpec {
    pub fn resolution(height: NonZeroU32, video_codec: VideoCodec, config: &Config) -> Self {
        ConversionSpec::Resolution {
            height,
            video_codec,
            audio_codec: config.convert.audio_codec.clone(),
        }
    }

    pub fn audio_extract(config: &Config) -> Self {
        ConversionSpec::AudioExtract {
            audio_codec: config.extract.audio_codec.clone(),
            audio_bitrate: config.extract.audio_bitrate.clone(),
            extension: config.extract.extension.clone(),
        }
    }

    pub fn mode(&self) -> RunMode {
        match self {
            ConversionSpec::Resolution { .. } => RunMode::ResolutionConvert,
            ConversionSpec::AudioExtract { .. } => RunMode::AudioExtract,
        }
    }

    /// Naming rule for output files of this run
    pub fn output_kind(&self) -> OutputKind {
        match self {
            ConversionSpec::Resolution { height, .. } => OutputKind::Resolution { height: *height },
            ConversionSpec::AudioExtract { extension, .. } => OutputKind::Audio {
                extension: extension.clone(),
            },
        }
    }

    /// Progress word printed while a file is being processed
    pub fn verb(&self) -> &'static str {
        match self {
            ConversionSpec::Resolution { .. } => "converting",
            ConversionSpec::AudioExtract { .. } => "extracting",
        }
    }

    /// Runs the encoder once for `input`, writing `output`.
    pub fn run<E: Encoder + ?Sized>(
        &self,
        encoder: &E,
        input: &Path,
        output: &Path,
    ) -> Result<(), EncodeError> {
        match self {
            ConversionSpec::Resolution {
                height,
                video_codec,
                audio_codec,
            } => encoder.run_conversion(&ConversionRequest {
                input,
                output,
                height: *height,
                video_codec: video_codec.name(),
                audio_codec,
            }),
            ConversionSpec::AudioExtract {
                audio_codec,
                audio_bitrate,
                ..
            } => encoder.run_extraction(&ExtractionRequest {
                input,
                output,
                audio_codec,
                audio_bitrate,
            }),
        }
    }
}
