//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::ConverterError;
use super::traits::{Transcoder, TranscoderOutput};

/// Default location of the ffmpeg executable.
#[cfg(windows)]
pub const DEFAULT_FFMPEG_PATH: &str = "resources/ffmpeg/ffmpeg.exe";

/// Default location of the ffmpeg executable.
#[cfg(not(windows))]
pub const DEFAULT_FFMPEG_PATH: &str = "/usr/bin/ffmpeg";

/// Runs the ffmpeg executable at a configured path.
///
/// The path is used as given; there is no `PATH` lookup.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    path: PathBuf,
}

impl FfmpegTranscoder {
    /// Creates a transcoder for the executable at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a transcoder for [`DEFAULT_FFMPEG_PATH`].
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_FFMPEG_PATH)
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::transcoder_missing(&self.path)
        } else {
            ConverterError::Io(e)
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn program(&self) -> &Path {
        &self.path
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(ConverterError::transcoder_missing(&self.path));
        }

        let output = Command::new(&self.path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConverterError::TranscoderUnusable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ConverterError::TranscoderUnusable {
                path: self.path.clone(),
                reason: format!("-version exited with code: {:?}", output.status.code()),
            });
        }

        Ok(())
    }

    async fn execute(&self, args: &[String]) -> Result<TranscoderOutput, ConverterError> {
        debug!(program = %self.path.display(), ?args, "Running transcoder");

        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        Ok(TranscoderOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_missing_path() {
        let dir = TempDir::new().unwrap();
        let transcoder = FfmpegTranscoder::new(dir.path().join("no-ffmpeg"));

        let err = transcoder.validate().await.unwrap_err();
        assert!(matches!(err, ConverterError::TranscoderMissing { .. }));
    }

    #[tokio::test]
    async fn test_execute_missing_path() {
        let dir = TempDir::new().unwrap();
        let transcoder = FfmpegTranscoder::new(dir.path().join("no-ffmpeg"));

        let err = transcoder
            .execute(&["-i".to_string(), "x.mp3".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::TranscoderMissing { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_validate_non_executable() {
        let dir = TempDir::new().unwrap();
        let fake = dir.path().join("ffmpeg");
        std::fs::write(&fake, b"not a program").unwrap();

        let transcoder = FfmpegTranscoder::new(&fake);
        let err = transcoder.validate().await.unwrap_err();
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_program_and_name() {
        let transcoder = FfmpegTranscoder::new("/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(transcoder.name(), "ffmpeg");
        assert_eq!(transcoder.program(), Path::new("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(
            FfmpegTranscoder::with_defaults().program(),
            Path::new(DEFAULT_FFMPEG_PATH)
        );
    }
}
