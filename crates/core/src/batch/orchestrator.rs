//! Sequential batch runner.

use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::converter::{
    build_convert_command, probe, ConverterError, FormatSettings, MediaMetadata, Transcoder,
};
use crate::files::{candidate_path, remove_files, resolve_output_path, staging_path};

use super::error::BatchError;
use super::progress::ProgressSink;
use super::types::{ConversionOutcome, ConversionRequest, ItemState};

/// Runs conversion batches against a [`Transcoder`].
///
/// Files are processed one at a time in request order. Each file is probed,
/// given a destination path, and converted; whatever happens, it yields one
/// [`ConversionOutcome`] and the batch continues with the next file.
pub struct BatchOrchestrator<T: Transcoder + ?Sized> {
    transcoder: Arc<T>,
    settings: FormatSettings,
}

impl<T: Transcoder + ?Sized + 'static> BatchOrchestrator<T> {
    /// Create a new orchestrator.
    pub fn new(transcoder: Arc<T>, settings: FormatSettings) -> Self {
        Self {
            transcoder,
            settings,
        }
    }

    /// Runs a batch to completion on the current task.
    ///
    /// The transcoder is validated first; if that fails nothing is touched
    /// and no progress is emitted. Otherwise two progress events are emitted
    /// per request (before and after) and one outcome is returned per
    /// request, in order.
    pub async fn run(
        &self,
        requests: &[ConversionRequest],
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Vec<ConversionOutcome>, BatchError> {
        self.transcoder.validate().await.map_err(|e| {
            error!(
                transcoder = self.transcoder.name(),
                program = %self.transcoder.program().display(),
                error = %e,
                "Transcoder is not usable, batch not started"
            );
            BatchError::Setup(e)
        })?;

        let total = requests.len();
        info!(total, "Starting conversion batch");

        let mut outcomes = Vec::with_capacity(total);
        for (idx, request) in requests.iter().enumerate() {
            let position = idx + 1;
            let name = display_name(&request.input_path);

            emit(
                progress,
                &format!("Processing ({}/{}): {}", position, total, name),
                percent(idx, total),
            );

            let outcome = self.process(request).await;

            let message = match &outcome {
                ConversionOutcome::Success { output_path, .. } => {
                    info!(
                        input = %request.input_path.display(),
                        output = %output_path.display(),
                        "Conversion succeeded"
                    );
                    format!("Done ({}/{}): {}", position, total, name)
                }
                ConversionOutcome::Failure {
                    error_description, ..
                } => {
                    warn!(
                        input = %request.input_path.display(),
                        error = %error_description,
                        "Conversion failed"
                    );
                    format!("Failed ({}/{}): {}", position, total, name)
                }
            };
            emit(progress, &message, percent(position, total));

            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            succeeded,
            failed = total - succeeded,
            "Conversion batch finished"
        );

        Ok(outcomes)
    }

    /// Runs a batch on a dedicated tokio task.
    ///
    /// Progress is delivered to `progress` from that task; pair it with a
    /// [`ChannelProgressSink`](super::ChannelProgressSink) to consume events
    /// on the caller's task.
    pub fn spawn(
        self: Arc<Self>,
        requests: Vec<ConversionRequest>,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> BatchHandle {
        let handle = tokio::spawn(async move { self.run(&requests, progress.as_deref()).await });
        BatchHandle { handle }
    }

    /// Drives one request through `Pending → Probing → Converting → done`.
    async fn process(&self, request: &ConversionRequest) -> ConversionOutcome {
        let input = request.input_path.as_path();
        let mut state = ItemState::Pending;

        // Validated earlier, but it may have gone since
        if !input.is_file() {
            advance(&mut state, ItemState::Failed, input);
            return failure(
                input,
                &ConverterError::InputNotFound {
                    path: input.to_path_buf(),
                },
            );
        }

        advance(&mut state, ItemState::Probing, input);
        let metadata = probe(self.transcoder.as_ref(), input).await;
        log_source_kind(input, &metadata, request);

        advance(&mut state, ItemState::Converting, input);
        let format = request.target_format;
        let output_path = if request.overwrite_mode {
            candidate_path(input, format, None)
        } else {
            resolve_output_path(input, format)
        };
        // ffmpeg truncates an existing target before encoding, so a
        // replacement is written aside and renamed over it once complete
        let write_path = if output_path.exists() {
            staging_path(&output_path)
        } else {
            output_path.clone()
        };

        let args = build_convert_command(
            input,
            format,
            &write_path,
            &self.settings.get(format),
            request.effective_preset(),
        );

        let result = match self.transcoder.execute(&args).await {
            Ok(output) if output.success => {
                if !write_path.is_file() {
                    Err(ConverterError::execution_failed(
                        format!(
                            "{} reported success but did not create {}",
                            self.transcoder.name(),
                            write_path.display()
                        ),
                        None,
                    ))
                } else if write_path != output_path {
                    tokio::fs::rename(&write_path, &output_path)
                        .await
                        .map_err(ConverterError::Io)
                } else {
                    Ok(())
                }
            }
            Ok(output) => Err(ConverterError::execution_failed(
                format!(
                    "{} exited with code: {:?}",
                    self.transcoder.name(),
                    output.exit_code
                ),
                Some(output.stderr),
            )),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                advance(&mut state, ItemState::Succeeded, input);
                ConversionOutcome::Success {
                    input_path: input.to_path_buf(),
                    output_path,
                    source_metadata: metadata,
                    target_format: format,
                }
            }
            Err(e) => {
                // write_path never names a file from before this run
                let cleanup = remove_files(std::slice::from_ref(&write_path)).await;
                if !cleanup.success() {
                    warn!(errors = ?cleanup.errors, "Could not remove partial output");
                }
                advance(&mut state, ItemState::Failed, input);
                failure(input, &e)
            }
        }
    }
}

/// Handle to a batch running on its own task.
pub struct BatchHandle {
    handle: JoinHandle<Result<Vec<ConversionOutcome>, BatchError>>,
}

impl BatchHandle {
    /// Waits for the batch to finish.
    pub async fn wait(self) -> Result<Vec<ConversionOutcome>, BatchError> {
        self.handle
            .await
            .map_err(|e| BatchError::Worker(e.to_string()))?
    }
}

fn emit(progress: Option<&dyn ProgressSink>, message: &str, percent: f32) {
    debug!(percent, "{}", message);
    if let Some(sink) = progress {
        sink.on_progress(message, percent);
    }
}

fn percent(done: usize, total: usize) -> f32 {
    if total == 0 {
        return 100.0;
    }
    (done as f32 / total as f32) * 100.0
}

fn advance(state: &mut ItemState, next: ItemState, input: &Path) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid transition {:?} -> {:?}",
        state,
        next
    );
    debug!(path = %input.display(), from = ?state, to = ?next, "Item state changed");
    *state = next;
}

fn failure(input: &Path, error: &ConverterError) -> ConversionOutcome {
    ConversionOutcome::Failure {
        input_path: input.to_path_buf(),
        error_description: error.diagnostic(),
    }
}

fn log_source_kind(input: &Path, metadata: &MediaMetadata, request: &ConversionRequest) {
    if !metadata.is_video {
        return;
    }
    if request.target_format.is_video() {
        info!(path = %input.display(), "Converting video");
    } else {
        info!(
            path = %input.display(),
            format = %request.target_format,
            "Extracting audio from video"
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
