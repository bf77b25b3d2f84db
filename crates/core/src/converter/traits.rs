//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;

/// Captured result of one transcoder process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscoderOutput {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Everything the process wrote to stderr.
    pub stderr: String,
}

impl TranscoderOutput {
    /// Output of a process that exited zero.
    pub fn succeeded(stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stderr: stderr.into(),
        }
    }

    /// Output of a process that exited with `code`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// An external command-line transcoder.
///
/// Implementations run one process per call and return its stderr. They do
/// not interpret the arguments; that is the job of the command builder and
/// the probe.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Path of the executable being driven.
    fn program(&self) -> &Path;

    /// Checks that the transcoder exists and can be run.
    async fn validate(&self) -> Result<(), ConverterError>;

    /// Runs the transcoder with `args` and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`TranscoderOutput::success`], not
    /// as an error. Errors are reserved for failing to start the process.
    async fn execute(&self, args: &[String]) -> Result<TranscoderOutput, ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EchoTranscoder {
        program: PathBuf,
    }

    #[async_trait]
    impl Transcoder for EchoTranscoder {
        fn name(&self) -> &str {
            "echo"
        }

        fn program(&self) -> &Path {
            &self.program
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }

        async fn execute(&self, args: &[String]) -> Result<TranscoderOutput, ConverterError> {
            Ok(TranscoderOutput::succeeded(args.join(" ")))
        }
    }

    #[tokio::test]
    async fn test_execute_through_trait_object() {
        let transcoder: Box<dyn Transcoder> = Box::new(EchoTranscoder {
            program: PathBuf::from("/bin/echo"),
        });
        let output = transcoder
            .execute(&["-i".to_string(), "a.mp3".to_string()])
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stderr, "-i a.mp3");
        assert_eq!(transcoder.program(), Path::new("/bin/echo"));
    }

    #[test]
    fn test_failed_output() {
        let output = TranscoderOutput::failed(1, "boom");
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
    }
}
