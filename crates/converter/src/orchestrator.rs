//! Batch run sequencing for vidconv
//!
//! Ties discovery, prompting, output-area reset and per-file encoding together
//! for one invocation of the tool.

use crate::encode::{EncodeError, Encoder};
use crate::jobs::{ConversionSpec, RunMode, VideoCodec};
use crate::output::{ensure_parent_exists, reset_output_area};
use crate::paths::{derive_output_path, PathError};
use crate::prompt::{confirm_extraction, prompt_target_height};
use crate::scan::discover;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use vidconv_config::{Config, FailurePolicy};

/// Error type for batch runs
#[derive(Debug, Error)]
pub enum RunError {
    /// Filesystem or console IO failed, including stdin closing mid-prompt
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An input could not be mapped to an output path
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// The encoder failed and the failure policy is `abort`
    #[error("stopped after {path:?} failed: {source}")]
    Aborted {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

/// Counts for a batch that ran to the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    /// Files whose encoder run failed; always 0 under the `ignore` policy
    pub failed: usize,
}

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The input folder held nothing to convert; the output folder was left alone
    NoInput,
    /// The user declined the audio extraction prompt
    Declined,
    Completed(RunSummary),
}

/// Result of handling a single input file
#[derive(Debug)]
pub struct ProcessedFile {
    pub output: PathBuf,
    pub result: Result<(), EncodeError>,
}

/// Runs one batch over the configured input folder.
pub struct Orchestrator<E: Encoder> {
    config: Config,
    encoder: E,
}

impl<E: Encoder> Orchestrator<E> {
    pub fn new(config: Config, encoder: E) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Run the whole batch for `mode`.
    ///
    /// Sequence:
    /// 1. Report the encoder version
    /// 2. Create the input and output folders if missing
    /// 3. Discover input files; stop early if there are none
    /// 4. Prompt (target height, or extraction confirmation)
    /// 5. Reset the output folder
    /// 6. Process every file in order
    ///
    /// Prompts read from `input`; everything shown to the user goes to `out`.
    pub fn run<R, W>(&self, mode: RunMode, input: &mut R, out: &mut W) -> Result<RunOutcome, RunError>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "This tool converts videos using the following FFmpeg:")?;
        writeln!(out, "{}", self.encoder.version())?;
        writeln!(out)?;

        let folders = &self.config.folders;
        fs::create_dir_all(&folders.input)?;
        fs::create_dir_all(&folders.output)?;

        let files = discover(&folders.input, &self.config.scan.extensions);
        if files.is_empty() {
            writeln!(
                out,
                "Put source files into the {} folder, then run again.",
                folders.input.display()
            )?;
            return Ok(RunOutcome::NoInput);
        }

        let spec = match mode {
            RunMode::ResolutionConvert => {
                let height = prompt_target_height(input, out)?;
                let video_codec =
                    VideoCodec::select(self.encoder.supports_hardware_encode(), &self.config);
                if video_codec.is_hardware() {
                    writeln!(out, "Using the GPU for video encoding.")?;
                    writeln!(out)?;
                }
                ConversionSpec::resolution(height, video_codec, &self.config)
            }
            RunMode::AudioExtract => {
                if !confirm_extraction(input, out)? {
                    debug!("Audio extraction declined");
                    return Ok(RunOutcome::Declined);
                }
                ConversionSpec::audio_extract(&self.config)
            }
        };

        // Nothing may be written to the output folder before this point
        reset_output_area(&folders.output)?;

        let summary = self.run_batch(&spec, &files, out)?;
        Ok(RunOutcome::Completed(summary))
    }

    fn run_batch<W: Write>(
        &self,
        spec: &ConversionSpec,
        files: &[PathBuf],
        out: &mut W,
    ) -> Result<RunSummary, RunError> {
        match spec.mode() {
            RunMode::ResolutionConvert => writeln!(out, "Starting video conversion.")?,
            RunMode::AudioExtract => writeln!(out, "Starting audio extraction.")?,
        }

        let policy = self.config.failure.policy;
        let total = files.len();
        let mut failed = 0;

        for (index, file) in files.iter().enumerate() {
            write!(out, "({}/{}) {}... ", index + 1, total, file.display())?;
            out.flush()?;
            write!(out, "{}... ", spec.verb())?;
            out.flush()?;

            let processed = self.process_file(spec, file)?;
            match (processed.result, policy) {
                (Ok(()), _) => {
                    debug!("Wrote {}", processed.output.display());
                    writeln!(out, "done")?;
                }
                (Err(e), FailurePolicy::Ignore) => {
                    debug!("Ignoring encoder failure for {}: {}", file.display(), e);
                    writeln!(out, "done")?;
                }
                (Err(e), FailurePolicy::Continue) => {
                    warn!("Encoding {} failed: {}", file.display(), e);
                    failed += 1;
                    writeln!(out, "failed")?;
                }
                (Err(e), FailurePolicy::Abort) => {
                    writeln!(out, "failed")?;
                    out.flush()?;
                    return Err(RunError::Aborted {
                        path: file.clone(),
                        source: e,
                    });
                }
            }
            out.flush()?;
        }

        if failed > 0 {
            writeln!(out)?;
            writeln!(out, "{} of {} files failed.", failed, total)?;
        }
        info!("Processed {} files, {} failed", total, failed);

        Ok(RunSummary { total, failed })
    }

    /// Convert a single input file.
    ///
    /// Derives the output path, creates its parent folders and runs the
    /// encoder once. Encoder failures are returned in [`ProcessedFile::result`]
    /// for the caller's failure policy; only path and filesystem problems are
    /// errors here.
    pub fn process_file(&self, spec: &ConversionSpec, input: &Path) -> Result<ProcessedFile, RunError> {
        let output = derive_output_path(
            input,
            &self.config.folders.input,
            &self.config.folders.output,
            &spec.output_kind(),
        )?;
        ensure_parent_exists(&output)?;

        let result = spec.run(&self.encoder, input, &output);
        Ok(ProcessedFile { output, result })
    }
}
