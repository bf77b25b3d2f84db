//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the transcoder.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Configured transcoder executable does not exist.
    #[error("Transcoder not found at path: {path}")]
    TranscoderMissing { path: PathBuf },

    /// Transcoder exists but could not be run.
    #[error("Transcoder at {path} is not usable: {reason}")]
    TranscoderUnusable { path: PathBuf, reason: String },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Format is not one the converter accepts.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Transcoder exited unsuccessfully.
    #[error("Conversion failed: {reason}")]
    ExecutionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error while spawning or talking to the transcoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new execution failed error with stderr output.
    pub fn execution_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new transcoder missing error.
    pub fn transcoder_missing(path: impl Into<PathBuf>) -> Self {
        Self::TranscoderMissing { path: path.into() }
    }

    /// Whether this error means no file in a batch can succeed.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::TranscoderMissing { .. } | Self::TranscoderUnusable { .. }
        )
    }

    /// Text suitable for a per-file failure report.
    ///
    /// Prefers the transcoder's own diagnostic output when it produced any.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::ExecutionFailed {
                stderr: Some(stderr),
                ..
            } if !stderr.trim().is_empty() => stderr.trim().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let err = ConverterError::execution_failed(
            "ffmpeg exited with code 1",
            Some("input.mp3: Invalid data found when processing input\n".to_string()),
        );
        assert_eq!(
            err.diagnostic(),
            "input.mp3: Invalid data found when processing input"
        );
    }

    #[test]
    fn test_diagnostic_falls_back_to_message() {
        let err = ConverterError::execution_failed("ffmpeg exited with code 1", Some("  ".into()));
        assert_eq!(err.diagnostic(), "Conversion failed: ffmpeg exited with code 1");

        let err = ConverterError::InputNotFound {
            path: PathBuf::from("/missing.wav"),
        };
        assert_eq!(err.diagnostic(), "Input file not found: /missing.wav");
    }

    #[test]
    fn test_setup_errors() {
        assert!(ConverterError::transcoder_missing("/opt/ffmpeg").is_setup_error());
        assert!(ConverterError::TranscoderUnusable {
            path: PathBuf::from("/opt/ffmpeg"),
            reason: "exit code 1".into(),
        }
        .is_setup_error());
        assert!(!ConverterError::execution_failed("boom", None).is_setup_error());
    }
}
