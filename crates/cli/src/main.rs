//! CLI entry point for vidconv
//!
//! Parses command line arguments, locates ffmpeg and runs one batch.

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use vidconv::config::ConfigError;
use vidconv::{
    locate, render_banner, Config, FfmpegEncoder, Orchestrator, RunError, RunMode, RunOutcome,
};

/// Configuration file picked up from the working directory when present
const DEFAULT_CONFIG: &str = "vidconv.toml";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Re-encode videos at a new height
    Convert,
    /// Extract the audio track as mp3
    Extract,
}

impl From<Mode> for RunMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Convert => RunMode::ResolutionConvert,
            Mode::Extract => RunMode::AudioExtract,
        }
    }
}

/// vidconv - batch video resolution converter and audio extractor
#[derive(Parser, Debug)]
#[command(name = "vidconv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Operation mode
    #[arg(long, value_enum, default_value_t = Mode::Convert)]
    mode: Mode,

    /// Path to a configuration file [default: vidconv.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log diagnostics at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "vidconv=debug"
    } else {
        "vidconv=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Anything that ends a run with a non-zero exit status
#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{command} was not found. Place it in the {dir} folder or add it to the system path.")]
    EncoderNotFound { command: String, dir: String },

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG),
    }
}

/// Load the configuration, print the banner, locate the encoder and run one batch.
fn run_app<R: BufRead, W: Write>(args: &Args, input: &mut R, out: &mut W) -> Result<RunOutcome, AppError> {
    let config = load_config(args.config.as_ref())?;
    tracing::debug!("Effective configuration: {:?}", config);

    let mode = RunMode::from(args.mode);
    write!(out, "{}", render_banner(mode))?;
    out.flush()?;

    let handle = locate(&config.encoder).ok_or_else(|| AppError::EncoderNotFound {
        command: config.encoder.command.clone(),
        dir: config.encoder.bundled_dir.display().to_string(),
    })?;
    tracing::debug!("Encoder resolved to {:?}", handle);

    let encoder = FfmpegEncoder::new(handle, config.encoder.hardware_video_codec.clone());
    let orchestrator = Orchestrator::new(config, encoder);
    Ok(orchestrator.run(mode, input, out)?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_app(&args, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(outcome) => {
            tracing::debug!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
