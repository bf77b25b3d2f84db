//! Types for the batch module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::converter::{MediaMetadata, QualityPreset, TargetFormat};

/// One file to convert. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Validated input file.
    pub input_path: PathBuf,
    /// Output format.
    pub target_format: TargetFormat,
    /// Encoder preset; only used for mp4 output.
    #[serde(default)]
    pub quality_preset: Option<QualityPreset>,
    /// Write to `<stem>_converted.<ext>` even if it exists, instead of
    /// picking a numbered name.
    #[serde(default)]
    pub overwrite_mode: bool,
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>, target_format: TargetFormat) -> Self {
        Self {
            input_path: input_path.into(),
            target_format,
            quality_preset: None,
            overwrite_mode: false,
        }
    }

    pub fn with_quality(mut self, preset: QualityPreset) -> Self {
        self.quality_preset = Some(preset);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_mode = overwrite;
        self
    }

    /// Preset that actually applies: the requested one (or default) for
    /// mp4, `None` for audio targets.
    pub fn effective_preset(&self) -> Option<QualityPreset> {
        if self.target_format.is_video() {
            Some(self.quality_preset.unwrap_or_default())
        } else {
            None
        }
    }
}

/// Format/quality/overwrite choices shared by every file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTemplate {
    pub target_format: TargetFormat,
    #[serde(default)]
    pub quality_preset: Option<QualityPreset>,
    #[serde(default)]
    pub overwrite_mode: bool,
}

impl RequestTemplate {
    pub fn new(target_format: TargetFormat) -> Self {
        Self {
            target_format,
            quality_preset: None,
            overwrite_mode: false,
        }
    }

    pub fn with_quality(mut self, preset: Option<QualityPreset>) -> Self {
        self.quality_preset = preset;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_mode = overwrite;
        self
    }

    /// One request per path, in order.
    pub fn for_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<ConversionRequest> {
        paths
            .iter()
            .map(|p| ConversionRequest {
                input_path: p.as_ref().to_path_buf(),
                target_format: self.target_format,
                quality_preset: self.quality_preset,
                overwrite_mode: self.overwrite_mode,
            })
            .collect()
    }
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success {
        input_path: PathBuf,
        output_path: PathBuf,
        source_metadata: MediaMetadata,
        target_format: TargetFormat,
    },
    Failure {
        input_path: PathBuf,
        /// Transcoder diagnostic text, or a description of what went wrong.
        error_description: String,
    },
}

impl ConversionOutcome {
    pub fn input_path(&self) -> &Path {
        match self {
            Self::Success { input_path, .. } | Self::Failure { input_path, .. } => input_path,
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Self::Success { output_path, .. } => Some(output_path),
            Self::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Per-file processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Pending,
    Probing,
    Converting,
    Succeeded,
    Failed,
}

impl ItemState {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether moving from `self` to `next` is allowed. There are no retries,
    /// so terminal states have no successors.
    pub fn can_transition_to(&self, next: ItemState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Probing)
                | (Self::Pending, Self::Failed)
                | (Self::Probing, Self::Converting)
                | (Self::Probing, Self::Failed)
                | (Self::Converting, Self::Succeeded)
                | (Self::Converting, Self::Failed)
        )
    }
}

/// A progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub message: String,
    /// Batch completion in [0, 100].
    pub percent: f32,
}

/// A failed item in a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub input_path: PathBuf,
    pub error_description: String,
}

/// Aggregate view of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Successful conversions whose source was a video container.
    pub video_sources: usize,
    /// Output files, in batch order.
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<FailedItem>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let mut summary = Self::default();

        for outcome in outcomes {
            match outcome {
                ConversionOutcome::Success {
                    output_path,
                    source_metadata,
                    ..
                } => {
                    summary.succeeded += 1;
                    if source_metadata.is_video {
                        summary.video_sources += 1;
                    }
                    summary.outputs.push(output_path.clone());
                }
                ConversionOutcome::Failure {
                    input_path,
                    error_description,
                } => {
                    summary.failed += 1;
                    summary.failures.push(FailedItem {
                        input_path: input_path.clone(),
                        error_description: error_description.clone(),
                    });
                }
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
