//! Batch orchestration.
//!
//! A batch is a list of [`ConversionRequest`]s processed strictly in order,
//! one transcoder process at a time. Every request produces exactly one
//! [`ConversionOutcome`]; per-file problems become `Failure` outcomes and the
//! loop moves on. Only setup problems (the transcoder cannot be used at all)
//! surface as [`BatchError`].
//!
//! # Example
//!
//! ```ignore
//! use mediabatch_core::batch::{BatchOrchestrator, ChannelProgressSink, RequestTemplate};
//! use mediabatch_core::converter::{FfmpegTranscoder, FormatSettings, TargetFormat};
//!
//! let orchestrator = Arc::new(BatchOrchestrator::new(
//!     Arc::new(FfmpegTranscoder::new("/usr/bin/ffmpeg")),
//!     FormatSettings::default(),
//! ));
//! let requests = RequestTemplate::new(TargetFormat::Mp3).for_paths(&files);
//!
//! let (sink, mut events) = ChannelProgressSink::new();
//! let handle = orchestrator.spawn(requests, Some(Arc::new(sink)));
//! while let Some(event) = events.recv().await {
//!     println!("{:>5.1}% {}", event.percent, event.message);
//! }
//! let outcomes = handle.wait().await?;
//! ```

mod error;
mod orchestrator;
mod progress;
mod types;

pub use error::BatchError;
pub use orchestrator::{BatchHandle, BatchOrchestrator};
pub use progress::{ChannelProgressSink, ProgressSink};
pub use types::{
    BatchSummary, ConversionOutcome, ConversionRequest, FailedItem, ItemState, ProgressEvent,
    RequestTemplate,
};
