//! vidconv
//!
//! Batch video conversion on top of an external ffmpeg binary: rescale every
//! video under the input folder, or extract its audio track, mirroring the
//! folder structure into the output folder.

pub mod banner;
pub mod encode;
pub mod jobs;
pub mod orchestrator;
pub mod output;
pub mod paths;
pub mod prompt;
pub mod scan;

pub use vidconv_config as config;
pub use vidconv_config::{Config, FailurePolicy};
pub use banner::render_banner;
pub use encode::{
    locate, ConversionRequest, EncodeError, Encoder, EncoderHandle, EncoderSource,
    ExtractionRequest, FfmpegEncoder,
};
pub use jobs::{ConversionSpec, RunMode, VideoCodec};
pub use orchestrator::{Orchestrator, ProcessedFile, RunError, RunOutcome, RunSummary};
pub use output::{ensure_parent_exists, reset_output_area};
pub use paths::{derive_output_path, OutputKind, PathError};
pub use prompt::{confirm_extraction, is_affirmative, parse_height, prompt_target_height, HeightError};
pub use scan::{discover, is_video_file};
