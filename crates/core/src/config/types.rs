use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::{FormatSettings, TargetFormat, DEFAULT_FFMPEG_PATH};
use crate::files::DEFAULT_ALLOWED_EXTENSIONS;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub app: AppConfig,
}

impl Config {
    /// Output formats a batch can target.
    pub fn supported_formats(&self) -> &'static [TargetFormat] {
        &TargetFormat::ALL
    }

    /// Format used when a request does not name one.
    pub fn default_format(&self) -> TargetFormat {
        self.transcoder.default_format
    }
}

/// Transcoder configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscoderConfig {
    /// Path to the ffmpeg executable. Used as-is, no `PATH` lookup.
    #[serde(default = "default_transcoder_path")]
    pub path: PathBuf,
    /// Output format when none is requested (default: mp3)
    #[serde(default = "default_format")]
    pub default_format: TargetFormat,
    /// Per-format codec settings, keyed by format id
    #[serde(default)]
    pub formats: FormatSettings,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            path: default_transcoder_path(),
            default_format: default_format(),
            formats: FormatSettings::default(),
        }
    }
}

fn default_transcoder_path() -> PathBuf {
    PathBuf::from(DEFAULT_FFMPEG_PATH)
}

fn default_format() -> TargetFormat {
    TargetFormat::Mp3
}

/// Batch behaviour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Maximum number of files accepted per batch (default: 20)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Input extensions accepted by the validator, lowercase without dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_max_files() -> usize {
    20
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}
