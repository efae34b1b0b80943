//! Core configuration structures and loading logic

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Input and output folder locations, relative to the working directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FolderConfig {
    /// Root scanned for source videos (created if absent)
    pub input: PathBuf,
    /// Root receiving converted files (cleared and recreated on every run)
    pub output: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("01.input"),
            output: PathBuf::from("02.output"),
        }
    }
}

/// External encoder settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncoderConfig {
    /// Bare command name looked up on the system search path
    pub command: String,
    /// Directory that may hold a bundled copy of the encoder
    pub bundled_dir: PathBuf,
    /// Video codec used when no hardware encoder is available
    pub software_video_codec: String,
    /// GPU video codec, used whenever the encoder lists it
    pub hardware_video_codec: String,
}

impl EncoderConfig {
    /// Location of the bundled encoder binary, with the platform executable suffix.
    ///
    /// For example `bin/ffmpeg` on Unix and `bin/ffmpeg.exe` on Windows.
    pub fn bundled_path(&self) -> PathBuf {
        self.bundled_dir
            .join(format!("{}{}", self.command, env::consts::EXE_SUFFIX))
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            command: "ffmpeg".to_string(),
            bundled_dir: PathBuf::from("bin"),
            software_video_codec: "libx264".to_string(),
            hardware_video_codec: "h264_nvenc".to_string(),
        }
    }
}

/// Resolution conversion settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConvertConfig {
    pub audio_codec: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            audio_codec: "aac".to_string(),
        }
    }
}

/// Audio extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub audio_codec: String,
    /// Constant bitrate passed to the encoder, e.g. `192k`
    pub audio_bitrate: String,
    /// Extension (without the dot) given to extracted files
    pub extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            audio_codec: "mp3".to_string(),
            audio_bitrate: "192k".to_string(),
            extension: "mp3".to_string(),
        }
    }
}

/// Input discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Accepted extensions including the leading dot, matched case-insensitively
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: [".mp4", ".avi", ".mkv", ".flv", ".mov", ".wmv"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// What to do when the encoder exits unsuccessfully for a file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure and move on to the next file
    #[default]
    Continue,
    /// Report the failure and stop the batch
    Abort,
    /// Do not inspect the encoder's exit status at all
    Ignore,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            "ignore" => Ok(FailurePolicy::Ignore),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailurePolicy::Continue => "continue",
            FailurePolicy::Abort => "abort",
            FailurePolicy::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// Encoder failure handling
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FailureConfig {
    pub policy: FailurePolicy,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub folders: FolderConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub failure: FailureConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Parses the file and fills missing optional fields with defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Overrides the following values if environment variables are set:
    /// - VIDCONV_INPUT_DIR -> folders.input
    /// - VIDCONV_OUTPUT_DIR -> folders.output
    /// - VIDCONV_ENCODER -> encoder.command
    /// - VIDCONV_FAILURE_POLICY -> failure.policy
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = non_empty_var("VIDCONV_INPUT_DIR") {
            self.folders.input = PathBuf::from(val);
        }

        if let Some(val) = non_empty_var("VIDCONV_OUTPUT_DIR") {
            self.folders.output = PathBuf::from(val);
        }

        if let Some(val) = non_empty_var("VIDCONV_ENCODER") {
            self.encoder.command = val;
        }

        // Invalid value, keep existing
        if let Some(val) = non_empty_var("VIDCONV_FAILURE_POLICY") {
            if let Ok(policy) = val.parse::<FailurePolicy>() {
                self.failure.policy = policy;
            }
        }
    }

    /// Load configuration from file and apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Config::load`], but falls back to the built-in defaults when
    /// `path` does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.is_empty())
}
