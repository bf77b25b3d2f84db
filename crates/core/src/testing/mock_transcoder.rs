//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, Transcoder, TranscoderOutput};

/// Mock implementation of the Transcoder trait.
///
/// Understands the two argument shapes the batch produces:
/// - `-i <input>` (probe): exits 1 and prints the configured stream report
/// - anything else (convert): input is `args[1]`, output is the last argument
///
/// Provides controllable behavior for testing:
/// - Record every invocation for assertions
/// - Fail conversions of chosen inputs with a diagnostic
/// - Create (or not) the output file on success
/// - Leave a partial output behind on failure
/// - Simulate a missing or unusable executable
///
/// # Example
///
/// ```rust,ignore
/// use mediabatch_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new();
/// transcoder.set_probe_report(fixtures::SAMPLE_MP3_REPORT).await;
/// transcoder.fail_input("/music/bad.mp3", "Invalid data found when processing input").await;
///
/// let outcomes = BatchOrchestrator::new(Arc::new(transcoder.clone()), settings)
///     .run(&requests, None)
///     .await?;
///
/// assert_eq!(transcoder.conversion_invocations().await.len(), requests.len());
/// ```
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    program: PathBuf,
    /// Recorded argument vectors, in call order.
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    /// Stream report returned for probes of paths without their own.
    probe_report: Arc<RwLock<String>>,
    /// Per-path stream reports.
    probe_reports: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Inputs whose conversion fails, with the stderr to report.
    failing_inputs: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Whether successful conversions write the output file.
    create_outputs: Arc<RwLock<bool>>,
    /// Whether failed conversions leave a partial output file.
    partial_output_on_failure: Arc<RwLock<bool>>,
    /// Simulate the executable not existing.
    missing: Arc<RwLock<bool>>,
    /// Simulate the executable existing but not running.
    unusable: Arc<RwLock<bool>>,
    /// Inputs whose conversion cannot even be started.
    spawn_failures: Arc<RwLock<HashSet<PathBuf>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("/mock/bin/ffmpeg"),
            invocations: Arc::new(RwLock::new(Vec::new())),
            probe_report: Arc::new(RwLock::new(String::new())),
            probe_reports: Arc::new(RwLock::new(HashMap::new())),
            failing_inputs: Arc::new(RwLock::new(HashMap::new())),
            create_outputs: Arc::new(RwLock::new(true)),
            partial_output_on_failure: Arc::new(RwLock::new(false)),
            missing: Arc::new(RwLock::new(false)),
            unusable: Arc::new(RwLock::new(false)),
            spawn_failures: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Get all recorded invocations.
    pub async fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations (probe and convert).
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Get recorded conversion invocations only.
    pub async fn conversion_invocations(&self) -> Vec<Vec<String>> {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|args| !is_probe(args))
            .cloned()
            .collect()
    }

    /// Clear recorded invocations.
    pub async fn clear_recorded(&self) {
        self.invocations.write().await.clear();
    }

    /// Set the stream report returned for every probe.
    pub async fn set_probe_report(&self, report: impl Into<String>) {
        *self.probe_report.write().await = report.into();
    }

    /// Set the stream report for one path.
    pub async fn set_probe_report_for(&self, path: impl AsRef<Path>, report: impl Into<String>) {
        self.probe_reports
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), report.into());
    }

    /// Make conversions of `path` exit 1 with `stderr`.
    pub async fn fail_input(&self, path: impl AsRef<Path>, stderr: impl Into<String>) {
        self.failing_inputs
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), stderr.into());
    }

    /// Make conversions of `path` fail to start.
    pub async fn fail_spawn_for(&self, path: impl AsRef<Path>) {
        self.spawn_failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Choose whether successful conversions write their output file.
    pub async fn set_create_outputs(&self, create: bool) {
        *self.create_outputs.write().await = create;
    }

    /// Choose whether failed conversions leave a partial output file.
    pub async fn set_partial_output_on_failure(&self, partial: bool) {
        *self.partial_output_on_failure.write().await = partial;
    }

    /// Simulate the executable being absent.
    pub async fn set_missing(&self, missing: bool) {
        *self.missing.write().await = missing;
    }

    /// Simulate the executable failing its version check.
    pub async fn set_unusable(&self, unusable: bool) {
        *self.unusable.write().await = unusable;
    }

    async fn probe_output(&self, input: &Path) -> TranscoderOutput {
        let report = match self.probe_reports.read().await.get(input) {
            Some(report) => report.clone(),
            None => self.probe_report.read().await.clone(),
        };
        TranscoderOutput::failed(
            1,
            format!("{}At least one output file must be specified\n", report),
        )
    }

    async fn convert_output(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<TranscoderOutput, ConverterError> {
        if self.spawn_failures.read().await.contains(input) {
            return Err(ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "simulated spawn failure",
            )));
        }

        if let Some(stderr) = self.failing_inputs.read().await.get(input).cloned() {
            if *self.partial_output_on_failure.read().await {
                tokio::fs::write(output, b"partial").await?;
            }
            return Ok(TranscoderOutput::failed(1, stderr));
        }

        if *self.create_outputs.read().await {
            tokio::fs::write(output, format!("converted from {}", input.display())).await?;
        }

        Ok(TranscoderOutput::succeeded(String::new()))
    }
}

fn is_probe(args: &[String]) -> bool {
    args.len() == 2 && args[0] == "-i"
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn program(&self) -> &Path {
        &self.program
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if *self.missing.read().await {
            return Err(ConverterError::transcoder_missing(&self.program));
        }
        if *self.unusable.read().await {
            return Err(ConverterError::TranscoderUnusable {
                path: self.program.clone(),
                reason: "-version exited with code: Some(1)".to_string(),
            });
        }
        Ok(())
    }

    async fn execute(&self, args: &[String]) -> Result<TranscoderOutput, ConverterError> {
        self.invocations.write().await.push(args.to_vec());

        if *self.missing.read().await {
            return Err(ConverterError::transcoder_missing(&self.program));
        }

        let input = match args.get(1) {
            Some(input) if args.first().map(String::as_str) == Some("-i") => PathBuf::from(input),
            _ => {
                return Ok(TranscoderOutput::failed(
                    1,
                    "Unrecognized option or missing input\n",
                ))
            }
        };

        if is_probe(args) {
            return Ok(self.probe_output(&input).await);
        }

        match args.last() {
            Some(output) => self.convert_output(&input, Path::new(output)).await,
            None => Ok(TranscoderOutput::failed(1, "No output file\n")),
        }
    }
}
